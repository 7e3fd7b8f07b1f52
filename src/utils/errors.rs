use thiserror::Error;

use crate::constants::{CONNECTION_ERROR_MESSAGE, REGISTRATION_FAILED_MESSAGE};

/// Main error type for CureLink application plumbing
#[derive(Error, Debug)]
pub enum CureLinkError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("UI error: {0}")]
    UIError(String),
}

/// Failure of a single chat exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// No response reached the client
    #[error("Network error: {0}")]
    Network(String),

    /// A response arrived but reported an application-level error
    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    /// A success response arrived without the expected fields
    #[error("Parse error: {0}")]
    Parse(String),

    /// The exchange task died before producing a result
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ExchangeError {
    /// Short label used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Server { .. } => "server",
            Self::Parse(_) => "parse",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

/// Failure of the account registration flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The backend rejected the registration
    #[error("Registration rejected ({status}): {}", .detail.as_deref().unwrap_or(REGISTRATION_FAILED_MESSAGE))]
    Rejected { status: u16, detail: Option<String> },

    /// The backend could not be reached or answered with an unreadable body
    #[error("Connection error: {0}")]
    Connection(String),
}

impl RegistrationError {
    /// Text shown to the person registering
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected {
                detail: Some(detail),
                ..
            } => detail,
            Self::Rejected { detail: None, .. } => REGISTRATION_FAILED_MESSAGE,
            Self::Connection(_) => CONNECTION_ERROR_MESSAGE,
        }
    }
}
