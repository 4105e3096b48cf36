//! Authentication commands

use cadence_common::validation::{validate_email, validate_password, validate_username};
use cadence_core::ChatGateway;
use cadence_domain::{CadenceError, Result};
use tracing::info;

use crate::context::AppContext;

/// Log in with an existing account, prompting for the password
pub async fn login(ctx: &AppContext, username: &str) -> Result<()> {
    validate_username(username).map_err(CadenceError::Validation)?;

    let password = prompt_password()?;
    validate_password(&password).map_err(CadenceError::Validation)?;

    info!(username = %username, "Logging in");
    let response = ctx.gateway.login(username, &password).await?;

    println!("Logged in as {}.", response.user.username);
    Ok(())
}

/// Create an account, prompting for the password
pub async fn signup(ctx: &AppContext, username: &str, email: Option<&str>) -> Result<()> {
    validate_username(username).map_err(CadenceError::Validation)?;
    if let Some(email) = email {
        validate_email(email).map_err(CadenceError::Validation)?;
    }

    let password = prompt_password()?;
    validate_password(&password).map_err(CadenceError::Validation)?;

    info!(username = %username, "Signing up");
    let response = ctx.gateway.signup(username, &password, email).await?;

    println!("Account created. Logged in as {}.", response.user.username);
    Ok(())
}

/// End the session
pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.chat.logout().await?;
    println!("Logged out.");
    Ok(())
}

fn prompt_password() -> Result<String> {
    rpassword::prompt_password("Password: ")
        .map_err(|e| CadenceError::Internal(format!("failed to read password: {}", e)))
}
