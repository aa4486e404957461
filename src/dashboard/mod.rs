//! # Dashboard: HTTP Transport for the Project Registry
//!
//! Runs an Axum HTTP server mapping REST routes onto [`Store`] operations.
//!
//! | Route | Operation | Success |
//! |-------|-----------|---------|
//! | `GET /` | list all | 200 |
//! | `GET /team/{team}[?engineer=..]` | list by team (and engineer) | 200 |
//! | `GET /id/{project_id}` | get by id | 200 |
//! | `GET /number/{project_number}` | get by project number | 200 |
//! | `POST /create-project` | create | 201 + record |
//! | `PUT /update-progress` | update progress | 204 |
//! | `DELETE /delete-project/{project_number}` | delete by project number | 204 |
//! | `DELETE /id/{project_id}` | delete by id | 204 |
//! | `GET /healthz`, `/readyz`, `/metrics` | probes and Prometheus scrape | 200 |
//!
//! Failures map through [`RegistryError`](crate::error::RegistryError):
//! 422 validation, 404 not found, 409 conflict, 500 storage. Undecodable
//! bodies, paths and queries keep the extractor's status but still answer
//! with a JSON `{"error": ..}` body.

mod extract;
mod routes_health;
mod routes_projects;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Instrument};

use crate::config::ServerConfig;
use crate::error::RegistryError;
use crate::prom_metrics;
use crate::store::Store;

pub struct AppState {
    pub store: Store,
    pub config: ServerConfig,
    pub prom_metrics: prom_metrics::Metrics,
}

impl AppState {
    pub fn new(store: Store, config: ServerConfig) -> Arc<Self> {
        Arc::new(AppState {
            store,
            config,
            prom_metrics: prom_metrics::Metrics::new(),
        })
    }

    /// Count a mutation attempt and, on success, refresh the project gauge.
    pub(super) async fn observe_mutation<T>(
        &self,
        operation: &str,
        result: &Result<T, RegistryError>,
    ) {
        let outcome = result.as_ref().err().map_or("ok", RegistryError::kind);
        self.prom_metrics.record_mutation(operation, outcome);
        if result.is_ok() {
            self.refresh_project_gauge().await;
        }
    }

    pub async fn refresh_project_gauge(&self) {
        match self.store.count().await {
            Ok(n) => {
                self.prom_metrics.projects.set(n);
            }
            Err(e) => warn!(error = %e, "failed to count projects"),
        }
    }
}

/// Middleware that records HTTP request duration into the Prometheus histogram,
/// generates (or propagates) a request ID for correlation, and wraps the
/// request in a tracing span.
async fn metrics_middleware(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> axum::response::Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let raw_path = req.uri().path().to_string();
    let norm_path = normalize_path(&raw_path);
    let start = std::time::Instant::now();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %raw_path,
    );
    let mut response = next.run(req).instrument(span).await;

    state
        .prom_metrics
        .http_request_duration
        .get_or_create(&prom_metrics::HttpLabel {
            method,
            path: norm_path,
        })
        .observe(start.elapsed().as_secs_f64());

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Collapse per-record path segments into placeholders so histogram labels
/// stay bounded.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            let parent = i.checked_sub(1).map(|p| segments[p]);
            if seg.is_empty() {
                seg.to_string()
            } else if seg.chars().all(|c| c.is_ascii_digit()) {
                ":id".to_string()
            } else {
                match parent {
                    Some("number") | Some("delete-project") => ":project_number".to_string(),
                    Some("team") => ":team".to_string(),
                    _ => seg.to_string(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.body_limit_bytes;
    let timeout = state.config.request_timeout();

    Router::new()
        .route("/", get(routes_projects::handler_projects_list))
        .route("/team/{team}", get(routes_projects::handler_projects_by_team))
        .route(
            "/id/{project_id}",
            get(routes_projects::handler_project_get_by_id)
                .delete(routes_projects::handler_project_delete_by_id),
        )
        .route(
            "/number/{project_number}",
            get(routes_projects::handler_project_get_by_number),
        )
        .route(
            "/create-project",
            post(routes_projects::handler_project_create),
        )
        .route(
            "/update-progress",
            put(routes_projects::handler_project_update_progress),
        )
        .route(
            "/delete-project/{project_number}",
            delete(routes_projects::handler_project_delete_by_number),
        )
        .route("/healthz", get(routes_health::handler_healthz))
        .route("/readyz", get(routes_health::handler_readyz))
        .route("/metrics", get(routes_health::handler_metrics))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CatchPanicLayer::new())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}

/// Bind, serve until Ctrl+C or SIGTERM, then drain in-flight requests.
pub async fn run(config: ServerConfig, store: Store) -> Result<()> {
    config.validate()?;
    let address = config.address();
    let state = AppState::new(store, config);
    state.refresh_project_gauge().await;
    let app = build_router(state.clone());

    let listener = TcpListener::bind(&address).await?;
    info!(
        address = %address,
        backend = state.store.backend(),
        "pimtrack listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
