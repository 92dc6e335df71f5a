//! Lookup API Server
//!
//! HTTP API exposing the lookup pipeline, the caller address echo and a
//! health endpoint. Optionally serves a static front end.

use crate::application::LookupService;
use crate::infrastructure::ShutdownController;
use axum::{
    extract::{rejection::QueryRejection, ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Headers consulted for the caller address, highest priority first.
const CLIENT_IP_HEADERS: [&str; 3] = ["cf-connecting-ip", "x-real-ip", "x-forwarded-for"];

/// Query string of `/api/lookup`.
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub target: String,
}

/// Caller address response.
#[derive(Debug, Serialize)]
pub struct IpResponse {
    pub ip: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub providers: Vec<&'static str>,
}

/// Error body for a lookup that could not start.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub query: String,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<LookupService>,
}

impl ApiState {
    pub fn new(service: Arc<LookupService>) -> Self {
        Self { service }
    }
}

/// API Server for lookups.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
    public_dir: Option<PathBuf>,
}

impl ApiServer {
    pub fn new(
        listen_addr: String,
        service: Arc<LookupService>,
        public_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            listen_addr,
            state: ApiState::new(service),
            public_dir,
        }
    }

    /// Build the router with all routes and layers.
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.public_dir.as_deref())
    }

    /// Run the API server until `shutdown` fires.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self, shutdown: ShutdownController) -> anyhow::Result<()> {
        let app = self.router();

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("lookup API listening on {}", self.listen_addr);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await?;

        tracing::info!("lookup API stopped");
        Ok(())
    }
}

fn build_router(state: ApiState, public_dir: Option<&std::path::Path>) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/ip", get(ip_handler))
        .route("/api/lookup", get(lookup_handler));

    let router = match public_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Determine the caller address from proxy headers, then the peer address.
///
/// Only the first entry of a comma separated header is considered; values
/// that are not IP addresses are skipped.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    CLIENT_IP_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .find_map(|first| first.trim().parse::<IpAddr>().ok())
        .or_else(|| peer.map(|addr| addr.ip()))
        .map(|ip| ip.to_canonical())
}

// Handler functions

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: state.service.provider_ids(),
    };
    Json(response)
}

async fn ip_handler(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> impl IntoResponse {
    let ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr))
        .map(|ip| ip.to_string())
        .unwrap_or_default();
    Json(IpResponse { ip })
}

async fn lookup_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    uri: Uri,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!("malformed lookup query {:?}: {}", uri.query(), rejection);
            let body = ErrorResponse {
                error: rejection.body_text(),
                query: uri.query().unwrap_or_default().to_string(),
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let caller = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));

    match state.service.lookup(&query.target, caller).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            tracing::debug!("lookup rejected for {:?}: {}", query.target, e);
            let body = ErrorResponse {
                error: e.to_string(),
                query: query.target.trim().to_string(),
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}
