//! Cadence - Calendar Assistant Chat Client
//!
//! Main entry point for the command-line application.

mod cli;
mod commands;
mod context;

use clap::Parser;
use cli::{CalendarAction, Cli, Command};
use context::AppContext;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging FIRST so we can see .env loading
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => warn!(error = %e, "Could not load .env file"),
    }

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => cadence_infra::config::load_from_file(Some(path.clone()))?,
        None => cadence_infra::config::load().unwrap_or_else(|e| {
            warn!(error = %e, "No configuration found, using defaults");
            cadence_domain::Config::default()
        }),
    };

    info!(backend = %config.backend.base_url, "Cadence starting");
    let ctx = AppContext::new(config)?;

    let result = match cli.command {
        Command::Login { username } => commands::auth::login(&ctx, &username).await,
        Command::Signup { username, email } => {
            commands::auth::signup(&ctx, &username, email.as_deref()).await
        }
        Command::Logout => commands::auth::logout(&ctx).await,
        Command::Send { message } => commands::chat::send(&ctx, &message).await,
        Command::History => commands::chat::history(&ctx).await,
        Command::Chat => commands::chat::interactive(&ctx).await,
        Command::Status => commands::chat::status(&ctx).await,
        Command::Calendar { action } => match action {
            CalendarAction::Connect => commands::calendar::connect(&ctx).await,
            CalendarAction::Disconnect => commands::calendar::disconnect(&ctx).await,
            CalendarAction::Status => commands::calendar::status(&ctx).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
