//! Command handlers
//!
//! Thin handlers over the chat session service. Each handler logs, delegates,
//! and prints a human-readable result; all real behaviour lives in the
//! library crates.

pub mod auth;
pub mod calendar;
pub mod chat;

use cadence_core::InitOutcome;
use cadence_domain::Message;

use crate::context::AppContext;

/// Resolve the session, printing guidance when authentication is missing.
///
/// Returns `false` when the caller should stop because there is no session.
pub async fn require_session(ctx: &AppContext) -> cadence_domain::Result<bool> {
    match ctx.chat.initialize().await? {
        InitOutcome::MustAuthenticate => {
            println!("Not logged in. Run `cadence login <username>` first.");
            Ok(false)
        }
        InitOutcome::Ready => Ok(true),
    }
}

/// Render one message the way the transcript view does: local time, role,
/// content.
pub fn print_message(message: &Message) {
    let timestamp = message.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
    println!("[{}] {}: {}", timestamp, message.role, message.content);
}
