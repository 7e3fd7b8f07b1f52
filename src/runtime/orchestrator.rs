use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::{
    app::Config,
    client::HttpCoordinator,
    session::ConversationController,
    tui::{run_ui, App},
};

/// Main runtime orchestrator for the interactive chat
pub struct Orchestrator {
    config: Config,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the chat until the user quits
    pub async fn run(self) -> Result<()> {
        let coordinator = HttpCoordinator::new(&self.config.api)?;
        let endpoint = coordinator.chat_url().to_string();
        info!(endpoint = %endpoint, "Starting chat session");

        let controller = ConversationController::new(Arc::new(coordinator));
        let app = App::new(controller, &self.config.ui, endpoint);

        let result = run_ui(app).await;
        info!("Chat session ended");
        result
    }
}
