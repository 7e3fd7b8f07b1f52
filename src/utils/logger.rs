use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log events go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// No subscriber is installed and events are dropped
    Off,
}

impl LogTarget {
    /// The terminal UI owns the screen, so it only ever logs to a file
    pub fn for_mode(interactive: bool, log_file: Option<PathBuf>) -> Self {
        match (interactive, log_file) {
            (false, _) => Self::Stderr,
            (true, Some(path)) => Self::File(path),
            (true, None) => Self::Off,
        }
    }
}

/// Initialize the logging system
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies.
pub fn init_logger(default_level: &str, target: &LogTarget) -> Result<()> {
    let log_file = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => None,
        LogTarget::File(path) => Some(path.as_path()),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false) // Don't show module paths
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact();

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.with_writer(io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
