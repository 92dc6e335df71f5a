//! Domain error types.

use std::time::Duration;

/// Failure to turn a hostname into an address.
///
/// Terminal for the request: no provider is contacted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Unable to resolve domain to IP")]
    Unresolvable { host: String, reason: String },
}

/// Failure of a single provider call.
///
/// Never propagated past the dispatch step; the display text becomes the
/// provider's `error` entry in the payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
    #[error("HTTP {0}")]
    Status(u16),
    /// The provider answered but reported a failure in the body.
    #[error("{0}")]
    Upstream(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors returned by the request orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Unable to determine client IP")]
    NoClientAddress,
}
