//! Chat session orchestration

pub mod ports;
mod service;

pub use service::{ChatSessionService, InitOutcome};
