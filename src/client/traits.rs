use async_trait::async_trait;

use super::types::{ChatReply, ChatRequest};
use crate::utils::ExchangeError;

/// Performs the network exchange for one conversation turn.
///
/// Exactly one exchange per call: implementations never retry, batch or
/// queue. Keeping calls serialized is the caller's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestCoordinator: Send + Sync {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ExchangeError>;
}
