use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::client::AccountRole;

#[derive(Parser, Debug)]
#[command(name = "curelink")]
#[command(version)]
#[command(about = "Chat with the CureLink appointment assistant from your terminal", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Backend base URL (overrides config and CURELINK_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Non-interactive message to send; repeat for several turns in one session
    #[arg(short, long)]
    pub prompt: Vec<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn is_interactive(&self) -> bool {
        self.prompt.is_empty() && matches!(self.command, None | Some(Commands::Chat))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a chat session (default)
    Chat,
    /// Create a new account
    Register {
        /// Email address
        #[arg(long)]
        email: String,
        /// Full name
        #[arg(long)]
        full_name: String,
        /// Password
        #[arg(long, env = "CURELINK_PASSWORD", hide_env_values = true)]
        password: String,
        /// Account type
        #[arg(long, value_enum, default_value_t = AccountRole::Patient)]
        role: AccountRole,
    },
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
