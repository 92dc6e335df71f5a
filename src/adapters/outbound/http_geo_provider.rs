//! HTTP Geo Provider
//!
//! Implements GeoProvider on top of reqwest for any entry of the provider
//! table.

use super::providers::ProviderSpec;
use crate::domain::entities::{GeoRecord, LookupResult};
use crate::domain::errors::ProviderError;
use crate::domain::ports::GeoProvider;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use std::time::Duration;

/// Build the shared HTTP client used by all providers.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// One upstream provider reached over HTTP.
///
/// Issues exactly one GET per lookup, bounded by `timeout`. Every failure is
/// turned into a failure [`LookupResult`]; nothing escapes `fetch`.
pub struct HttpGeoProvider {
    spec: &'static ProviderSpec,
    base_url: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpGeoProvider {
    /// Create a provider talking to its production endpoint.
    pub fn new(
        spec: &'static ProviderSpec,
        client: reqwest::Client,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Self::with_base_url(spec, spec.base_url, client, timeout)
    }

    /// Create a provider talking to a different host (mirrors, mock servers).
    pub fn with_base_url(
        spec: &'static ProviderSpec,
        base_url: &str,
        client: reqwest::Client,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("{} is not a usable base URL for {}", base_url, spec.id);
        }

        Ok(Self {
            spec,
            base_url,
            client,
            timeout,
        })
    }

    async fn try_fetch(&self, target: &str) -> Result<GeoRecord, ProviderError> {
        let url = (self.spec.build_url)(&self.base_url, target);
        tracing::debug!(provider = self.spec.id, %url, "querying provider");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| self.transport_error(e))?;

        (self.spec.normalize)(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else if e.is_decode() {
            ProviderError::InvalidResponse(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl GeoProvider for HttpGeoProvider {
    fn id(&self) -> &'static str {
        self.spec.id
    }

    fn label(&self) -> &'static str {
        self.spec.label
    }

    async fn fetch(&self, target: &str) -> LookupResult {
        match self.try_fetch(target).await {
            Ok(record) => LookupResult::success(self.spec.id, self.spec.label, record),
            Err(e) => {
                tracing::warn!(provider = self.spec.id, ip = target, "lookup failed: {}", e);
                LookupResult::failure(self.spec.id, self.spec.label, e.to_string())
            }
        }
    }
}
