use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    app::Config,
    cli::OutputFormat,
    client::{HttpCoordinator, RequestCoordinator},
    session::{ConversationController, TurnOutcome},
};

/// Result of one turn in a non-interactive run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The message that was sent
    pub prompt: String,
    /// The assistant entry that ended the turn
    pub response: String,
    /// Whether the turn ended in the fallback entry
    pub failed: bool,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

/// Result of a non-interactive run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    pub turns: Vec<TurnReport>,
    /// Session token held at the end of the run
    pub session_id: Option<String>,
}

impl NonInteractiveResult {
    pub fn has_failures(&self) -> bool {
        self.turns.iter().any(|t| t.failed)
    }
}

/// Sends prompts one after another through a single conversation
pub struct NonInteractiveRunner {
    controller: ConversationController,
}

impl NonInteractiveRunner {
    pub fn new(config: &Config) -> Result<Self> {
        let coordinator = HttpCoordinator::new(&config.api)?;
        Ok(Self::with_coordinator(Arc::new(coordinator)))
    }

    pub fn with_coordinator(coordinator: Arc<dyn RequestCoordinator>) -> Self {
        Self {
            controller: ConversationController::new(coordinator),
        }
    }

    /// Run every prompt as its own turn, in order. Blank prompts are skipped.
    pub async fn execute(&mut self, prompts: &[String]) -> NonInteractiveResult {
        let mut turns = Vec::with_capacity(prompts.len());

        for prompt in prompts {
            let start = Instant::now();
            let outcome = self.controller.submit(prompt).await;
            let (response, failed) = match outcome {
                TurnOutcome::Ignored => continue,
                TurnOutcome::Answered(text) => (text, false),
                TurnOutcome::Fallback => (self.last_entry(), true),
            };
            turns.push(TurnReport {
                prompt: prompt.trim().to_string(),
                response,
                failed,
                duration_ms: start.elapsed().as_millis(),
            });
        }

        NonInteractiveResult {
            turns,
            session_id: self.controller.session_token().map(str::to_owned),
        }
    }

    fn last_entry(&self) -> String {
        self.controller
            .messages()
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }

    /// Format the result for output
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result)
                .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)),
            OutputFormat::Text => {
                let mut output = String::new();
                for turn in &result.turns {
                    output.push_str(&format!("{} {}\n", "You:".green().bold(), turn.prompt));
                    let response = if turn.failed {
                        turn.response.red().to_string()
                    } else {
                        turn.response.clone()
                    };
                    output.push_str(&format!("{} {}\n\n", "CureLink:".cyan().bold(), response));
                }
                output.trim_end().to_string()
            }
        }
    }
}
