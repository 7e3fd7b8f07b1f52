use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::app::UIConfig;
use crate::session::{ConversationController, TurnState};

/// Terminal-side state wrapped around the conversation
pub struct App {
    /// The conversation being shown
    pub controller: ConversationController,
    /// User input buffer
    pub input: String,
    /// Is the app running?
    pub running: bool,
    /// Lines scrolled up from the bottom of the chat view
    pub scroll_offset: u16,
    /// Header title
    pub title: String,
    /// Show message times
    pub show_timestamps: bool,
    /// Backend the client talks to, for the status bar
    pub endpoint: String,
    /// Set by the conversation subscriber when new entries arrive
    new_entries: Arc<AtomicBool>,
}

impl App {
    /// Create a new app instance
    pub fn new(
        mut controller: ConversationController,
        ui: &UIConfig,
        endpoint: impl Into<String>,
    ) -> Self {
        let new_entries = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&new_entries);
        let seen = AtomicUsize::new(controller.messages().len());
        controller.subscribe(move |snapshot| {
            let count = snapshot.messages.len();
            if seen.swap(count, Ordering::Relaxed) != count {
                flag.store(true, Ordering::Relaxed);
            }
        });

        Self {
            controller,
            input: String::new(),
            running: true,
            scroll_offset: 0,
            title: ui.title.clone(),
            show_timestamps: ui.show_timestamps,
            endpoint: endpoint.into(),
            new_entries,
        }
    }

    pub fn is_sending(&self) -> bool {
        self.controller.state() == TurnState::Sending
    }

    /// Typing is disabled while a turn is in flight
    pub fn push_char(&mut self, c: char) {
        if !self.is_sending() {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_sending() {
            self.input.pop();
        }
    }

    /// Jump back to the newest entry once the conversation has grown
    pub fn follow_new_entries(&mut self) {
        if self.new_entries.swap(false, Ordering::Relaxed) {
            self.scroll_offset = 0;
        }
    }

    /// Scroll chat view up
    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    /// Scroll chat view down
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}
