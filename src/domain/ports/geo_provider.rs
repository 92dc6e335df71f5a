//! Geo Provider Port
//!
//! Defines the interface for one upstream geolocation service.

use crate::domain::entities::LookupResult;
use async_trait::async_trait;

/// One upstream IP metadata service.
///
/// This is an outbound port. Implementations issue a single request for the
/// given target and translate whatever comes back, including transport and
/// application failures, into a [`LookupResult`]. They must never panic on
/// malformed input.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Stable identifier used in the response payload.
    fn id(&self) -> &'static str;

    /// Human readable name.
    fn label(&self) -> &'static str;

    /// Look up a single IP address.
    async fn fetch(&self, target: &str) -> LookupResult;
}
