//! Target Resolver Service
//!
//! Turns raw user input into the IP address the providers are queried with.

use crate::domain::entities::ResolvedTarget;
use crate::domain::errors::ResolveError;
use crate::domain::ports::HostResolver;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Resolves user input into a concrete lookup target.
///
/// IP literals pass through untouched. Anything else is treated as a
/// hostname and resolved with a single forward lookup, bounded by
/// `timeout`.
pub struct TargetResolver {
    resolver: Arc<dyn HostResolver>,
    timeout: Duration,
}

impl TargetResolver {
    pub fn new(resolver: Arc<dyn HostResolver>, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }

    /// Resolve raw input.
    ///
    /// An empty (or whitespace-only) input yields an empty target; the caller
    /// is expected to substitute the client's own address.
    pub async fn resolve(&self, raw: &str) -> Result<ResolvedTarget, ResolveError> {
        let input = raw.trim();

        if input.is_empty() {
            return Ok(ResolvedTarget {
                input: String::new(),
                target: String::new(),
                hostname: None,
            });
        }

        if input.parse::<IpAddr>().is_ok() {
            return Ok(ResolvedTarget {
                input: input.to_string(),
                target: input.to_string(),
                hostname: None,
            });
        }

        let addr = self.lookup_first(input).await?;
        tracing::debug!("resolved {} -> {}", input, addr);

        Ok(ResolvedTarget {
            input: input.to_string(),
            target: addr.to_string(),
            hostname: Some(input.to_string()),
        })
    }

    async fn lookup_first(&self, host: &str) -> Result<IpAddr, ResolveError> {
        let unresolvable = |reason: String| {
            tracing::warn!("dns lookup for {} failed: {}", host, reason);
            ResolveError::Unresolvable {
                host: host.to_string(),
                reason,
            }
        };

        match tokio::time::timeout(self.timeout, self.resolver.lookup(host)).await {
            Ok(Ok(addrs)) => addrs
                .into_iter()
                .next()
                .ok_or_else(|| unresolvable("no addresses".to_string())),
            Ok(Err(e)) => Err(unresolvable(e.to_string())),
            Err(_) => Err(unresolvable(format!(
                "timed out after {} ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
