//! geo-lookup - Multi-provider IP geolocation service
//!
//! This is the composition root that wires together all the components.

use geo_lookup::adapters::inbound::ApiServer;
use geo_lookup::adapters::outbound::{
    build_client, select_providers, HttpGeoProvider, SystemHostResolver,
};
use geo_lookup::config::load_config;
use geo_lookup::domain::ports::GeoProvider;
use geo_lookup::domain::services::TargetResolver;
use geo_lookup::infrastructure::{shutdown_signal, ShutdownController};
use geo_lookup::LookupService;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting geo-lookup listen={} provider_timeout={}ms dns_timeout={}ms",
        cfg.listen_addr,
        cfg.provider_timeout_ms,
        cfg.dns_timeout_ms
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapters
    let client = build_client()?;
    let provider_timeout = Duration::from_millis(cfg.provider_timeout_ms);

    let mut providers: Vec<Arc<dyn GeoProvider>> = Vec::new();
    for spec in select_providers(&cfg.providers) {
        let provider = HttpGeoProvider::new(spec, client.clone(), provider_timeout)?;
        tracing::debug!("provider enabled: {} ({})", spec.id, spec.base_url);
        providers.push(Arc::new(provider));
    }

    let resolver = TargetResolver::new(
        Arc::new(SystemHostResolver::new()),
        Duration::from_millis(cfg.dns_timeout_ms),
    );

    // 2. Application service
    let service = Arc::new(LookupService::new(resolver, providers, provider_timeout));
    tracing::info!("providers: {}", service.provider_ids().join(", "));

    // 3. Inbound adapter
    let public_dir = cfg.public_dir.map(PathBuf::from);
    if let Some(dir) = &public_dir {
        tracing::info!("serving static files from {}", dir.display());
    }
    let server = ApiServer::new(cfg.listen_addr, service, public_dir);

    let shutdown = ShutdownController::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    server.run(shutdown).await
}
