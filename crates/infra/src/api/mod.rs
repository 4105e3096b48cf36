//! Backend gateway over HTTP

mod client;
mod gateway;

pub use client::{ApiClient, ApiClientConfig};
pub use gateway::BackendGateway;
