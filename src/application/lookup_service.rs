//! Lookup Service - Main application use case
//!
//! Orchestrates a lookup: resolving the target, fanning out to every
//! provider, and aggregating the results. This is the primary interface for
//! the inbound adapter.

use crate::domain::entities::{AggregatePayload, LookupResponse, LookupResult, ResolvedTarget};
use crate::domain::errors::{LookupError, ProviderError};
use crate::domain::ports::GeoProvider;
use crate::domain::services::{aggregate, TargetResolver};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Lookup service - main application use case.
///
/// This service orchestrates the lookup:
/// 1. Resolves the raw query into a target address
/// 2. Queries every provider concurrently, each under its own deadline
/// 3. Computes the median coordinate over the successful answers
pub struct LookupService {
    resolver: TargetResolver,
    providers: Vec<Arc<dyn GeoProvider>>,
    provider_timeout: Duration,
}

impl LookupService {
    /// Create a new lookup service.
    ///
    /// `providers` order is the order results appear in every payload.
    pub fn new(
        resolver: TargetResolver,
        providers: Vec<Arc<dyn GeoProvider>>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            providers,
            provider_timeout,
        }
    }

    /// Number of configured providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Ids of the configured providers, in declaration order.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Resolve a raw query and run all providers against it.
    ///
    /// An empty query looks up `client_ip`. Only a resolution failure (or a
    /// missing client address) is an error; provider failures are part of
    /// the response.
    pub async fn lookup(
        &self,
        query: &str,
        client_ip: Option<IpAddr>,
    ) -> Result<LookupResponse, LookupError> {
        let resolved = self.resolver.resolve(query).await?;

        let resolved = if resolved.is_self_lookup() {
            let ip = client_ip.ok_or(LookupError::NoClientAddress)?;
            ResolvedTarget {
                target: ip.to_string(),
                ..resolved
            }
        } else {
            resolved
        };

        let payload = self.run_lookups(&resolved.target).await;

        tracing::info!(
            "lookup input={:?} target={} ok={}/{}",
            resolved.input,
            resolved.target,
            payload.providers.iter().filter(|r| r.is_ok()).count(),
            payload.providers.len()
        );

        Ok(LookupResponse::new(resolved, payload))
    }

    /// Query every provider for `target` and aggregate the results.
    ///
    /// Each provider runs on its own task under `provider_timeout`; the call
    /// returns once all of them have finished or been cut off. Results keep
    /// declaration order regardless of completion order. Dropping the
    /// returned future aborts every task still running.
    pub async fn run_lookups(&self, target: &str) -> AggregatePayload {
        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let target = target.to_string();
                let timeout = self.provider_timeout;

                tokio::spawn(async move {
                    // dropping the fetch future on timeout cancels the request
                    match tokio::time::timeout(timeout, provider.fetch(&target)).await {
                        Ok(result) => result,
                        Err(_) => {
                            tracing::warn!("provider {} timed out for {}", provider.id(), target);
                            LookupResult::failure(
                                provider.id(),
                                provider.label(),
                                ProviderError::Timeout(timeout).to_string(),
                            )
                        }
                    }
                })
            })
            .collect();

        let _tasks = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());

        let providers: Vec<LookupResult> = futures::future::join_all(handles)
            .await
            .into_iter()
            .zip(&self.providers)
            .map(|(joined, provider)| {
                joined.unwrap_or_else(|e| {
                    tracing::error!("provider {} task failed: {}", provider.id(), e);
                    LookupResult::failure(provider.id(), provider.label(), "provider task failed")
                })
            })
            .collect();

        let aggregate = aggregate(&providers);

        AggregatePayload {
            query: target.to_string(),
            providers,
            aggregate,
        }
    }
}

/// Aborts the provider tasks when the dispatch is dropped before they finish.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}
