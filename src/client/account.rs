use anyhow::Result;
use clap::ValueEnum;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use super::types::detail_from_body;
use crate::app::ApiConfig;
use crate::constants::REGISTER_PATH;
use crate::utils::RegistrationError;

/// Kind of account being created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    #[default]
    Patient,
    Doctor,
}

/// Body of `POST {base}/auth/register`
#[derive(Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: AccountRole,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish()
    }
}

/// Client for the create-account flow, independent of chat
pub struct AccountClient {
    client: Client,
    register_url: String,
}

impl AccountClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            register_url: api.endpoint(REGISTER_PATH),
        })
    }

    /// Create an account. The returned user object is passed through as-is.
    pub async fn register(&self, registration: &Registration) -> Result<Value, RegistrationError> {
        debug!(url = %self.register_url, email = %registration.email, "Registering account");

        let response = self
            .client
            .post(&self.register_url)
            .json(registration)
            .send()
            .await
            .map_err(|e| RegistrationError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RegistrationError::Connection(e.to_string()))?;

        if !status.is_success() {
            let detail = detail_from_body(&body);
            warn!(status = status.as_u16(), detail = ?detail, "Registration rejected");
            return Err(RegistrationError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|e| RegistrationError::Connection(e.to_string()))
    }
}
