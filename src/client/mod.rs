// Gateway module for backend clients - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod account;
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to access client functionality
pub use account::{AccountClient, AccountRole, Registration};
pub use http::HttpCoordinator;
pub use traits::RequestCoordinator;
pub use types::{ChatReply, ChatRequest};

#[cfg(test)]
pub use traits::MockRequestCoordinator;
