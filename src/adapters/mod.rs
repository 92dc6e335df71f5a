//! Adapters Layer
//!
//! Inbound adapters drive the application (HTTP API); outbound adapters are
//! driven by it (upstream providers, DNS).

pub mod inbound;
pub mod outbound;
