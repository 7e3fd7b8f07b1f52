use anyhow::Result;
use clap::Parser;

use curelink::{
    app::{load_config, load_config_file, log_file_path, Config},
    cli::{handle_command, Cli},
    runtime::{NonInteractiveRunner, Orchestrator},
    utils::{init_logger, LogTarget},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging; the TUI owns the terminal, so it logs to a file or not at all
    let level = if cli.verbose { "debug" } else { "warn" };
    let target = LogTarget::for_mode(cli.is_interactive(), log_file_path());
    if let Err(e) = init_logger(level, &target) {
        eprintln!("⚠️  Failed to initialise logging: {}", e);
    }

    let config = resolve_config(&cli)?;

    if let Some(command) = &cli.command {
        if handle_command(command, &config).await? {
            return Ok(()); // Command handled, exit
        }
    }

    if !cli.prompt.is_empty() {
        return run_non_interactive(&cli, &config).await;
    }

    Orchestrator::new(config).run().await
}

/// Config file (explicit or discovered) with the --api-url override applied
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        },
    };

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    Ok(config)
}

/// Run in non-interactive mode
async fn run_non_interactive(cli: &Cli, config: &Config) -> Result<()> {
    let mut runner = NonInteractiveRunner::new(config)?;
    let result = runner.execute(&cli.prompt).await;

    println!("{}", runner.format_result(&result, cli.output_format));

    // Exit with appropriate code
    if result.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
