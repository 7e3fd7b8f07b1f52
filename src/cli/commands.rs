use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{init_config, Config},
    client::{AccountClient, Registration},
};

use super::Commands;

/// Handle CLI subcommands
///
/// Returns `true` when the command was fully handled and the process should
/// exit instead of opening the chat.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing CureLink configuration...");
            match init_config()? {
                Some(path) => println!("Created default configuration at: {}", path.display()),
                None => println!("Configuration already exists, leaving it untouched."),
            }
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Register {
            email,
            full_name,
            password,
            role,
        } => {
            let registration = Registration {
                email: email.clone(),
                password: password.clone(),
                full_name: full_name.clone(),
                role: *role,
            };
            if !register(config, &registration).await? {
                std::process::exit(1);
            }
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Create an account and print the user object the backend returns.
///
/// A rejected or unreachable registration is reported here and yields
/// `Ok(false)`; `Err` is left for local setup failures.
pub async fn register(config: &Config, registration: &Registration) -> Result<bool> {
    let client = AccountClient::new(&config.api)?;
    match client.register(registration).await {
        Ok(user) => {
            println!("{}", "Account created.".green());
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}", err.user_message().red());
            Ok(false)
        }
    }
}

/// Show version information
pub fn show_version() {
    println!("CureLink v{}", env!("CARGO_PKG_VERSION"));
    println!("   Terminal chat for the CureLink appointment assistant");
}
