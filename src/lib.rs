pub mod app;
pub mod cli;
pub mod client;
pub mod constants;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use client::{AccountClient, HttpCoordinator, RequestCoordinator};
pub use session::{ConversationController, ConversationStore, TurnOutcome, TurnState};
pub use tui::run_ui;
pub use utils::{CureLinkError, ExchangeError, RegistrationError};
