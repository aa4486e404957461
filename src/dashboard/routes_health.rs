//! # Probes and Metrics
//!
//! - `GET /healthz`: liveness, always 200 while the process serves requests.
//! - `GET /readyz`: readiness. The in-memory store is always ready; the
//!   PostgreSQL store must answer `SELECT 1` within [`READY_TIMEOUT`].
//! - `GET /metrics`: OpenMetrics text for Prometheus scraping.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;

const READY_TIMEOUT: Duration = Duration::from_secs(2);

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

pub(super) async fn handler_healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(super) async fn handler_readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match tokio::time::timeout(READY_TIMEOUT, state.store.health_check()).await {
        Ok(Ok(())) => (StatusCode::OK, "ok"),
        Ok(Err(e)) => {
            warn!(backend = state.store.backend(), error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
        Err(_) => {
            warn!(backend = state.store.backend(), "readiness check timed out");
            (StatusCode::SERVICE_UNAVAILABLE, "store timeout")
        }
    }
}

/// The project gauge is refreshed on scrape so rows written by other
/// processes sharing the database are counted too.
pub(super) async fn handler_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.refresh_project_gauge().await;
    (
        [(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)],
        state.prom_metrics.encode(),
    )
}
