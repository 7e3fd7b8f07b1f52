use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::message::Message;
use super::store::{ConversationSnapshot, ConversationStore, SubscriptionId};
use crate::client::{ChatReply, ChatRequest, RequestCoordinator};
use crate::constants::FALLBACK_MESSAGE;
use crate::utils::ExchangeError;

/// Where the conversation is in its request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Sending,
}

/// What a submission ended up doing to the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank text or a turn already in flight; nothing changed
    Ignored,
    /// The backend answered with this text
    Answered(String),
    /// The exchange failed and the fallback entry was appended
    Fallback,
}

/// Drives the conversation: one turn in flight at most, every failure
/// collapsed into the same fallback entry.
pub struct ConversationController {
    store: ConversationStore,
    coordinator: Arc<dyn RequestCoordinator>,
}

impl ConversationController {
    pub fn new(coordinator: Arc<dyn RequestCoordinator>) -> Self {
        Self {
            store: ConversationStore::new(),
            coordinator,
        }
    }

    pub fn state(&self) -> TurnState {
        if self.store.is_pending() {
            TurnState::Sending
        } else {
            TurnState::Idle
        }
    }

    pub fn snapshot(&self) -> ConversationSnapshot<'_> {
        self.store.snapshot()
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.store.session_token()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ConversationSnapshot<'_>) + Send + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// `Idle -> Sending`.
    ///
    /// Appends the trimmed text as a user entry and returns the request to
    /// dispatch. Returns `None` without touching anything for blank text or
    /// while a turn is already in flight.
    pub fn begin_turn(&mut self, text: &str) -> Option<ChatRequest> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank submission");
            return None;
        }
        if self.store.is_pending() {
            debug!("Ignoring submission while a turn is in flight");
            return None;
        }

        self.store.append(Message::user(text));
        self.store.set_pending(true);
        debug!("Turn started");

        Some(ChatRequest::new(
            text,
            self.store.session_token().map(str::to_owned),
        ))
    }

    /// `Sending -> Idle`, applying the exchange result.
    ///
    /// A result that arrives with no turn in flight is dropped.
    pub fn finish_turn(&mut self, result: Result<ChatReply, ExchangeError>) -> TurnOutcome {
        if !self.store.is_pending() {
            warn!("Discarding exchange result with no turn in flight");
            return TurnOutcome::Ignored;
        }

        let outcome = match result {
            Ok(reply) => {
                if let Some(token) = reply.new_session_token {
                    if self.store.assign_session(token) {
                        info!("Session token assigned");
                    }
                }
                let text = reply.response_text;
                self.store.append(Message::assistant(text.clone()));
                TurnOutcome::Answered(text)
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "Chat turn failed");
                self.store.append(Message::assistant(FALLBACK_MESSAGE));
                TurnOutcome::Fallback
            }
        };

        self.store.set_pending(false);
        debug!("Turn finished");
        outcome
    }

    /// Run the exchange for `request` on its own task.
    ///
    /// A panic or abort inside the exchange resolves to
    /// [`ExchangeError::Unexpected`] so the turn can still be finished.
    pub fn spawn_exchange(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, ExchangeError>> + Send + 'static {
        let coordinator = Arc::clone(&self.coordinator);
        let task = tokio::spawn(async move { coordinator.send(request).await });
        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(ExchangeError::Unexpected(e.to_string())),
            }
        }
    }

    /// Submit text and wait for the turn to resolve
    pub async fn submit(&mut self, text: &str) -> TurnOutcome {
        let Some(request) = self.begin_turn(text) else {
            return TurnOutcome::Ignored;
        };
        let result = self.spawn_exchange(request).await;
        self.finish_turn(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockRequestCoordinator;
    use crate::constants::WELCOME_MESSAGE;
    use crate::session::MessageRole;
    use pretty_assertions::assert_eq;

    fn transcript(controller: &ConversationController) -> Vec<(MessageRole, String)> {
        controller
            .messages()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect()
    }

    fn reply(text: &str, session: Option<&str>) -> ChatReply {
        ChatReply {
            response_text: text.to_string(),
            new_session_token: session.map(str::to_owned),
        }
    }

    #[test]
    fn test_fresh_conversation() {
        let controller = ConversationController::new(Arc::new(MockRequestCoordinator::new()));
        assert_eq!(controller.state(), TurnState::Idle);
        assert_eq!(
            transcript(&controller),
            vec![(MessageRole::Assistant, WELCOME_MESSAGE.to_string())]
        );
        assert!(!controller.snapshot().pending);
    }

    #[tokio::test]
    async fn test_successful_turn_assigns_session() {
        let mut mock = MockRequestCoordinator::new();
        mock.expect_send()
            .withf(|req| req.message == "I have a headache" && req.session_id.is_none())
            .times(1)
            .returning(|_| Ok(reply("Let's find a specialist.", Some("abc123"))));
        let mut controller = ConversationController::new(Arc::new(mock));

        let outcome = controller.submit("I have a headache").await;

        assert_eq!(outcome, TurnOutcome::Answered("Let's find a specialist.".to_string()));
        assert_eq!(
            transcript(&controller),
            vec![
                (MessageRole::Assistant, WELCOME_MESSAGE.to_string()),
                (MessageRole::User, "I have a headache".to_string()),
                (MessageRole::Assistant, "Let's find a specialist.".to_string()),
            ]
        );
        assert_eq!(controller.session_token(), Some("abc123"));
        assert_eq!(controller.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn test_session_is_sticky_across_turns() {
        let mut mock = MockRequestCoordinator::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_send()
            .withf(|req| req.session_id.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(reply("Let's find a specialist.", Some("abc123"))));
        mock.expect_send()
            .withf(|req| {
                req.message == "Book appointment" && req.session_id.as_deref() == Some("abc123")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(reply("Which day suits you?", None)));
        mock.expect_send()
            .withf(|req| req.session_id.as_deref() == Some("abc123"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ExchangeError::Network("connection reset".to_string())));
        let mut controller = ConversationController::new(Arc::new(mock));

        controller.submit("I have a headache").await;
        controller.submit("Book appointment").await;
        controller.submit("Tuesday").await;

        // Neither a reply without a token nor a failure clears it
        assert_eq!(controller.session_token(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_newer_session_replaces_old() {
        let mut mock = MockRequestCoordinator::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(reply("first", Some("abc123"))));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(reply("second", Some("def456"))));
        let mut controller = ConversationController::new(Arc::new(mock));

        controller.submit("one").await;
        controller.submit("two").await;

        assert_eq!(controller.session_token(), Some("def456"));
    }

    #[tokio::test]
    async fn test_every_failure_kind_falls_back() {
        let failures = vec![
            ExchangeError::Network("connection refused".to_string()),
            ExchangeError::Server {
                status: 500,
                detail: Some("database unavailable".to_string()),
            },
            ExchangeError::Parse("missing field `response`".to_string()),
        ];

        for failure in failures {
            let mut mock = MockRequestCoordinator::new();
            let returned = failure.clone();
            mock.expect_send()
                .times(1)
                .returning(move |_| Err(returned.clone()));
            let mut controller = ConversationController::new(Arc::new(mock));

            let outcome = controller.submit("hello").await;

            assert_eq!(outcome, TurnOutcome::Fallback, "failure: {failure}");
            let messages = controller.messages();
            assert_eq!(messages.len(), 3);
            assert_eq!(messages[1].role, MessageRole::User);
            assert_eq!(messages[2].role, MessageRole::Assistant);
            assert_eq!(messages[2].content, "Error: Could not connect to service.");
            assert_eq!(controller.state(), TurnState::Idle);
            assert_eq!(controller.session_token(), None);
        }
    }

    struct PanickingCoordinator;

    #[async_trait::async_trait]
    impl RequestCoordinator for PanickingCoordinator {
        async fn send(&self, _request: ChatRequest) -> Result<ChatReply, ExchangeError> {
            panic!("transport blew up")
        }
    }

    #[tokio::test]
    async fn test_panicking_exchange_returns_to_idle() {
        let mut controller = ConversationController::new(Arc::new(PanickingCoordinator));

        let outcome = controller.submit("hello").await;

        assert_eq!(outcome, TurnOutcome::Fallback);
        assert_eq!(controller.state(), TurnState::Idle);
        assert_eq!(controller.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_submission_is_ignored() {
        let mut mock = MockRequestCoordinator::new();
        mock.expect_send().times(0);
        let mut controller = ConversationController::new(Arc::new(mock));

        for blank in ["", "   ", "\t\n "] {
            assert_eq!(controller.submit(blank).await, TurnOutcome::Ignored);
        }

        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.state(), TurnState::Idle);
    }

    #[test]
    fn test_submission_is_trimmed() {
        let mut controller = ConversationController::new(Arc::new(MockRequestCoordinator::new()));

        let request = controller.begin_turn("  I feel dizzy \n").unwrap();

        assert_eq!(request.message, "I feel dizzy");
        assert_eq!(request.user_role, "patient");
        assert_eq!(controller.messages()[1].content, "I feel dizzy");
    }

    #[test]
    fn test_submit_while_sending_is_ignored() {
        let mut controller = ConversationController::new(Arc::new(MockRequestCoordinator::new()));

        assert!(controller.begin_turn("first").is_some());
        assert_eq!(controller.state(), TurnState::Sending);

        assert!(controller.begin_turn("second").is_none());
        assert!(controller.begin_turn("   ").is_none());

        assert_eq!(controller.messages().len(), 2);
        assert_eq!(controller.state(), TurnState::Sending);

        controller.finish_turn(Ok(reply("answer", None)));
        assert_eq!(controller.state(), TurnState::Idle);
        assert!(controller.begin_turn("third").is_some());
    }

    #[test]
    fn test_stray_result_is_discarded() {
        let mut controller = ConversationController::new(Arc::new(MockRequestCoordinator::new()));

        let outcome = controller.finish_turn(Ok(reply("late", Some("abc123"))));

        assert_eq!(outcome, TurnOutcome::Ignored);
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.session_token(), None);
    }

    #[tokio::test]
    async fn test_subscriber_tracks_turn() {
        use std::sync::Mutex;

        let mut mock = MockRequestCoordinator::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Ok(reply("hi there", Some("abc123"))));
        let mut controller = ConversationController::new(Arc::new(mock));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.subscribe(move |snap| {
            sink.lock().unwrap().push((
                snap.messages.len(),
                snap.pending,
                snap.session_token.map(str::to_owned),
            ));
        });

        controller.submit("hello").await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (2, false, None),
                (2, true, None),
                (2, true, Some("abc123".to_string())),
                (3, true, Some("abc123".to_string())),
                (3, false, Some("abc123".to_string())),
            ]
        );
    }
}
