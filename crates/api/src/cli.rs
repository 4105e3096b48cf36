//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cadence - calendar assistant chat client
#[derive(Debug, Parser)]
#[command(name = "cadence", version, about)]
pub struct Cli {
    /// Path to a config file (overrides the probed locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with an existing account (prompts for the password)
    Login {
        username: String,
    },
    /// Create an account (prompts for the password)
    Signup {
        username: String,
        /// Optional email address
        #[arg(long)]
        email: Option<String>,
    },
    /// End the session and clear the stored credential
    Logout,
    /// Send a single message to the assistant
    Send {
        message: String,
    },
    /// Print the message history
    History,
    /// Interactive chat session
    Chat,
    /// Show authentication and calendar link status
    Status,
    /// Manage the calendar link
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CalendarAction {
    /// Run the consent flow and link the calendar
    Connect,
    /// Revoke the calendar grant
    Disconnect,
    /// Check the current connection state
    Status,
}
