//! Calendar link commands

use cadence_domain::{ConnectionState, Result};
use tracing::info;

use super::require_session;
use crate::context::AppContext;

/// Link the calendar via the consent flow
pub async fn connect(ctx: &AppContext) -> Result<()> {
    if !require_session(ctx).await? {
        return Ok(());
    }

    if ctx.chat.connection_state().await.is_connected() {
        println!("Calendar is already connected.");
        return Ok(());
    }

    info!("Starting calendar consent flow");
    println!("Follow the authorization link (also logged) to grant calendar access...");

    let state = ctx.chat.toggle_calendar().await?;
    println!("Calendar: {}", state);
    Ok(())
}

/// Revoke the calendar grant
pub async fn disconnect(ctx: &AppContext) -> Result<()> {
    if !require_session(ctx).await? {
        return Ok(());
    }

    if !ctx.chat.connection_state().await.is_connected() {
        println!("Calendar is not connected.");
        return Ok(());
    }

    let state = ctx.chat.toggle_calendar().await?;
    println!("Calendar: {}", state);
    Ok(())
}

/// Probe and print the current connection state
pub async fn status(ctx: &AppContext) -> Result<()> {
    if !require_session(ctx).await? {
        return Ok(());
    }

    let state = ctx.chat.refresh_connection().await;
    match state {
        ConnectionState::Connected => println!("Calendar: connected"),
        other => println!("Calendar: {}", other),
    }
    Ok(())
}
