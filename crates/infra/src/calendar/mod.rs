//! Calendar link integration
//!
//! Wraps the external consent SDK behind the `CalendarLink` port. The SDK's
//! readiness sequencing and token client state live inside the adapter; the
//! rest of the system only ever sees connect/disconnect/check operations.

mod adapter;
mod sdk;

pub use adapter::CalendarLinkAdapter;
pub use sdk::{ConsentSdk, GoogleConsentClient, GoogleConsentSettings};
