//! PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
//!
//! Implements RFC 7636 for secure OAuth authorization without client secrets.
//! Used for desktop applications where client secrets cannot be safely stored.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure code verifier
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters).
/// Per RFC 7636, verifiers must be 43-128 characters long.
pub fn generate_code_verifier() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Generate code challenge from verifier using SHA256
///
/// Per RFC 7636, the challenge is BASE64URL(SHA256(ASCII(code_verifier)))
pub fn generate_code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Generate a random state token for CSRF protection
pub fn generate_state() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// PKCE challenge pair for OAuth 2.0 authorization
///
/// Contains the code verifier (sent during token exchange) and the
/// code challenge (sent during authorization request).
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// Random string (43-128 chars, base64url encoded).
    /// Kept secret until token exchange.
    pub code_verifier: String,

    /// SHA256 hash of code_verifier (base64url encoded).
    /// Sent in the authorization request for server validation.
    pub code_challenge: String,

    /// Random CSRF protection token.
    /// Must match between authorization request and callback.
    pub state: String,
}

impl PkceChallenge {
    /// Generate a new PKCE challenge with cryptographically secure random
    /// values
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = generate_code_verifier();
        let code_challenge = generate_code_challenge(&code_verifier);
        let state = generate_state();

        Self { code_verifier, code_challenge, state }
    }

    /// Get the challenge method (always "S256" for SHA256)
    #[must_use]
    pub fn challenge_method(&self) -> &str {
        "S256"
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::pkce.
    use super::*;

    #[test]
    fn test_generate_pkce_challenge() {
        let challenge = PkceChallenge::generate();

        // RFC 7636: 43-128 chars
        assert!(challenge.code_verifier.len() >= 43);
        assert!(challenge.code_verifier.len() <= 128);
        assert!(!challenge.code_challenge.is_empty());
        assert!(!challenge.state.is_empty());
    }

    #[test]
    fn test_unique_challenges() {
        let challenge1 = PkceChallenge::generate();
        let challenge2 = PkceChallenge::generate();

        assert_ne!(challenge1.code_verifier, challenge2.code_verifier);
        assert_ne!(challenge1.code_challenge, challenge2.code_challenge);
        assert_ne!(challenge1.state, challenge2.state);
    }

    #[test]
    fn test_base64url_encoding() {
        let challenge = PkceChallenge::generate();

        for value in [&challenge.code_verifier, &challenge.code_challenge, &challenge.state] {
            assert!(!value.contains('='));
            assert!(!value.contains('+'));
            assert!(!value.contains('/'));
        }
    }

    #[test]
    fn test_code_challenge_deterministic() {
        let challenge = PkceChallenge::generate();
        let recomputed = generate_code_challenge(&challenge.code_verifier);
        assert_eq!(challenge.code_challenge, recomputed);
    }

    #[test]
    fn test_challenge_method() {
        assert_eq!(PkceChallenge::generate().challenge_method(), "S256");
    }
}
