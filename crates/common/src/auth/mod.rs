//! Session credential management and OAuth helpers

pub mod pkce;
pub mod session;

pub use pkce::PkceChallenge;
pub use session::{SessionError, SessionStore};
