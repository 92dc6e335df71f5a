//! Host Resolver Port
//!
//! Defines the interface for forward DNS resolution.

use async_trait::async_trait;
use std::net::IpAddr;

/// Forward resolver for hostnames.
///
/// Implementations may use the system resolver or a DNS client library.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve a hostname to its addresses, in resolver order.
    async fn lookup(&self, host: &str) -> std::io::Result<Vec<IpAddr>>;
}
