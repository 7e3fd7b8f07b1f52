/// Constants module to avoid magic strings in the codebase

// Network Configuration
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const API_URL_ENV: &str = "CURELINK_API_URL";
pub const CONFIG_ENV_PREFIX: &str = "CURELINK_";
pub const CHAT_PATH: &str = "/chat";
pub const REGISTER_PATH: &str = "/auth/register";

/// Role sent with every chat exchange
pub const DEFAULT_USER_ROLE: &str = "patient";

// Conversation texts
pub const WELCOME_MESSAGE: &str = "Welcome to MediAssist. I can help you book appointments or find specialists. How can I help today?";
pub const FALLBACK_MESSAGE: &str = "Error: Could not connect to service.";

// Registration texts
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed.";
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error.";

// UI Configuration
pub const UI_TITLE: &str = "CureLink Assistant";
pub const UI_INPUT_PLACEHOLDER: &str = "Type your health concern here...";
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;

/// Capacity of the channel carrying exchange results back to the UI loop
pub const EXCHANGE_CHANNEL_CAPACITY: usize = 8;

pub const LOG_FILE_NAME: &str = "curelink.log";
