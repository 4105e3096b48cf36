//! Chat commands

use cadence_domain::{CadenceError, ConnectionState, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use super::{print_message, require_session};
use crate::context::AppContext;

/// Send a single message and print the assistant's reply
pub async fn send(ctx: &AppContext, message: &str) -> Result<()> {
    if !require_session(ctx).await? {
        return Ok(());
    }

    if !ctx.chat.connection_state().await.is_connected() {
        println!("Calendar is not connected. Run `cadence calendar connect` first.");
        return Ok(());
    }

    let reply = ctx.chat.send(message).await?;
    print_message(&reply);
    Ok(())
}

/// Print the full message history, oldest first
pub async fn history(ctx: &AppContext) -> Result<()> {
    if !require_session(ctx).await? {
        return Ok(());
    }

    let messages = ctx.chat.history().await;
    if messages.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }

    for message in &messages {
        print_message(message);
    }
    Ok(())
}

/// Interactive chat loop
///
/// Reads lines until EOF, interrupt, or `/quit`; each line is sent as a
/// message and the reply printed. Send rejections (validation, disconnected
/// calendar) are reported without ending the loop.
pub async fn interactive(ctx: &AppContext) -> Result<()> {
    if !require_session(ctx).await? {
        return Ok(());
    }

    let state = ctx.chat.connection_state().await;
    if state != ConnectionState::Connected {
        println!(
            "Calendar is {} - messages will be rejected until you run `cadence calendar connect`.",
            state
        );
    }

    for message in &ctx.chat.history().await {
        print_message(message);
    }
    println!("Type a message and press enter; /quit exits.");

    let mut editor = DefaultEditor::new()
        .map_err(|e| CadenceError::Internal(format!("failed to start line editor: {}", e)))?;

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line == "/quit" {
                    break;
                }
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match ctx.chat.send(line).await {
                    Ok(reply) => print_message(&reply),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                debug!(error = %e, "Line editor error");
                return Err(CadenceError::Internal(format!("line editor failed: {}", e)));
            }
        }
    }

    println!("Bye.");
    Ok(())
}

/// Show authentication and calendar status
pub async fn status(ctx: &AppContext) -> Result<()> {
    use cadence_core::CredentialStore;

    if ctx.credentials.is_authenticated().await {
        println!("Session: authenticated");
    } else {
        println!("Session: not logged in");
        return Ok(());
    }

    let state = ctx.chat.refresh_connection().await;
    println!("Calendar: {}", state);
    Ok(())
}
