/// Conversation session module - Gateway

mod controller;
mod identity;
mod message;
mod store;

pub use controller::{ConversationController, TurnOutcome, TurnState};
pub use identity::SessionIdentity;
pub use message::{Message, MessageLog, MessageRole};
pub use store::{ConversationSnapshot, ConversationStore, Subscriber, SubscriptionId};
