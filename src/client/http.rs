use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::RequestCoordinator;
use super::types::{detail_from_body, ChatReply, ChatRequest};
use crate::app::ApiConfig;
use crate::constants::CHAT_PATH;
use crate::utils::ExchangeError;

/// Chat exchange over HTTP against the CureLink backend
pub struct HttpCoordinator {
    client: Client,
    chat_url: String,
}

impl HttpCoordinator {
    /// Build a coordinator for the configured backend.
    ///
    /// No request timeout is set; the transport default applies.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            chat_url: api.endpoint(CHAT_PATH),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait]
impl RequestCoordinator for HttpCoordinator {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ExchangeError> {
        debug!(
            url = %self.chat_url,
            has_session = request.session_id.is_some(),
            "Sending chat exchange"
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ExchangeError::Server {
                status: status.as_u16(),
                detail: detail_from_body(&body),
            });
        }

        ChatReply::from_body(&body)
    }
}
