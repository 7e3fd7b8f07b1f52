use tracing::debug;

use super::identity::SessionIdentity;
use super::message::{Message, MessageLog};
use crate::constants::WELCOME_MESSAGE;

/// Read-only view of the conversation handed to renderers and subscribers
#[derive(Debug, Clone, Copy)]
pub struct ConversationSnapshot<'a> {
    pub messages: &'a [Message],
    pub session_token: Option<&'a str>,
    pub pending: bool,
}

/// Callback invoked with the new snapshot after every mutation
pub type Subscriber = Box<dyn Fn(&ConversationSnapshot<'_>) + Send>;

/// Handle returned by [`ConversationStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns the conversation state and notifies observers when it changes.
///
/// Mutators are crate-private: only the controller drives the conversation.
pub struct ConversationStore {
    log: MessageLog,
    session: SessionIdentity,
    pending: bool,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ConversationStore {
    /// A fresh conversation seeded with the standard welcome entry
    pub fn new() -> Self {
        let mut log = MessageLog::new();
        log.append(Message::assistant(WELCOME_MESSAGE));
        Self {
            log,
            session: SessionIdentity::new(),
            pending: false,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn snapshot(&self) -> ConversationSnapshot<'_> {
        ConversationSnapshot {
            messages: self.log.snapshot(),
            session_token: self.session.get(),
            pending: self.pending,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.log.snapshot()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session.get()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ConversationSnapshot<'_>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if the subscription was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub(crate) fn append(&mut self, message: Message) {
        self.log.append(message);
        self.notify();
    }

    pub(crate) fn set_pending(&mut self, pending: bool) {
        if self.pending != pending {
            self.pending = pending;
            self.notify();
        }
    }

    /// Returns `true` when the stored token changed
    pub(crate) fn assign_session(&mut self, token: impl Into<String>) -> bool {
        let changed = self.session.set(token);
        if changed {
            self.notify();
        }
        changed
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        debug!(
            messages = snapshot.messages.len(),
            pending = snapshot.pending,
            subscribers = self.subscribers.len(),
            "Conversation updated"
        );
        for (_, subscriber) in &self.subscribers {
            subscriber(&snapshot);
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
