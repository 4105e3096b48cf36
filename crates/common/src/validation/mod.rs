//! Input validation helpers
//!
//! Local checks applied before user input is allowed to reach the network.
//! Errors are plain strings; callers wrap them into the domain error type.

/// Maximum accepted message length, matching the backend limit
pub const MAX_MESSAGE_LENGTH: usize = 4000;
/// Minimum accepted username length
pub const MIN_USERNAME_LENGTH: usize = 1;
/// Maximum accepted username length
pub const MAX_USERNAME_LENGTH: usize = 64;
/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 1;

/// Validate chat message content
///
/// Rejects empty and whitespace-only content; these must never reach the
/// backend gateway.
pub fn validate_message_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("message content is empty".to_string());
    }
    if content.len() > MAX_MESSAGE_LENGTH {
        return Err(format!("message content exceeds {} bytes", MAX_MESSAGE_LENGTH));
    }
    Ok(())
}

/// Validate a username for login/signup
pub fn validate_username(username: &str) -> Result<(), String> {
    let trimmed = username.trim();
    if trimmed.len() < MIN_USERNAME_LENGTH {
        return Err("username is empty".to_string());
    }
    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(format!("username exceeds {} characters", MAX_USERNAME_LENGTH));
    }
    Ok(())
}

/// Validate a password for login/signup
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err("password is empty".to_string());
    }
    Ok(())
}

/// Validate an optional signup email
///
/// Minimal structural check only; the backend performs real verification.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err("email is missing '@'".to_string());
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err("email is malformed".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_messages_rejected() {
        assert!(validate_message_content("").is_err());
        assert!(validate_message_content("   ").is_err());
        assert!(validate_message_content("\n\t").is_err());
        assert!(validate_message_content("hi").is_ok());
    }

    #[test]
    fn test_oversized_message_rejected() {
        let oversized = "x".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(validate_message_content(&oversized).is_err());
    }

    #[test]
    fn test_username_bounds() {
        assert!(validate_username("").is_err());
        assert!(validate_username("  ").is_err());
        assert!(validate_username("ada").is_ok());
        assert!(validate_username(&"u".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@nodot").is_err());
    }
}
