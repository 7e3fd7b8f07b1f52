use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::DEFAULT_USER_ROLE;
use crate::utils::ExchangeError;

/// Body of `POST {base}/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    /// Serialized as `null` until the backend has issued a session
    pub session_id: Option<String>,
    /// Always `"patient"`; the chat client only speaks for patients
    pub user_role: &'static str,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            session_id,
            user_role: DEFAULT_USER_ROLE,
        }
    }
}

/// Successful outcome of one chat exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response_text: String,
    pub new_session_token: Option<String>,
}

impl ChatReply {
    /// Decode a 2xx response body
    pub fn from_body(body: &str) -> Result<Self, ExchangeError> {
        let parsed: ChatResponseBody =
            serde_json::from_str(body).map_err(|e| ExchangeError::Parse(e.to_string()))?;

        Ok(Self {
            response_text: parsed.response,
            // An empty token carries no session
            new_session_token: parsed.session_id.filter(|id| !id.is_empty()),
        })
    }
}

// Wire shape of the chat response

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    response: String,
    #[serde(default)]
    session_id: Option<String>,
}

/// Pull a `{"detail": "..."}` string out of an error body.
///
/// Validation errors carry a list under `detail`; only plain strings count.
pub(crate) fn detail_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
