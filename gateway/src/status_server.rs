//! HTTP status server
//!
//! # Endpoints
//!
//! - `GET /metrics` - Prometheus metrics
//! - `GET /health` - run status and counters as JSON
//! - `GET /state` - full state snapshot as JSON
//!
//! # Example
//!
//! ```ignore
//! use vahti_gateway::status_server::StatusServer;
//!
//! let (watch, runner) = Pipeline::new().build();
//! let handle = StatusServer::start("127.0.0.1:9400".parse()?, watch);
//! ```

use crate::state::{RunStatus, StateWatch};
use axum::extract::State;
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Shared state for the status server
#[derive(Clone)]
struct AppState {
    watch: StateWatch,
}

/// Status HTTP server
pub struct StatusServer;

impl StatusServer {
    /// Start the status server on `addr`
    ///
    /// Returns a JoinHandle that can be used to abort the server.
    pub fn start(addr: SocketAddr, watch: StateWatch) -> JoinHandle<()> {
        tokio::spawn(async move {
            let app = router(watch);

            info!(%addr, "Status server starting");

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    error!(error = %e, %addr, "Failed to bind status server");
                    return;
                }
            };

            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "Status server error");
            }
        })
    }
}

fn router(watch: StateWatch) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/state", get(state_handler))
        .with_state(AppState { watch })
}

/// Handler for /metrics endpoint
async fn metrics_handler() -> impl IntoResponse {
    let body = crate::metrics::gather();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

#[derive(serde::Serialize)]
struct HealthSummary {
    status: RunStatus,
    total_events: u64,
    critical_count: u64,
    warning_count: u64,
    dispatched_count: u64,
    queue: QueueHealth,
}

#[derive(serde::Serialize)]
struct QueueHealth {
    depth: f64,
    capacity: f64,
}

/// Handler for /health endpoint
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.watch.snapshot();
    let queue = crate::metrics::Metrics::get().map_or(
        QueueHealth {
            depth: 0.0,
            capacity: 0.0,
        },
        |m| QueueHealth {
            depth: m.queue_depth.get(),
            capacity: m.queue_capacity.get(),
        },
    );

    let summary = HealthSummary {
        status: snapshot.status,
        total_events: snapshot.total_events,
        critical_count: snapshot.critical_count,
        warning_count: snapshot.warning_count,
        dispatched_count: snapshot.dispatched_count,
        queue,
    };

    (StatusCode::OK, Json(summary))
}

/// Handler for /state endpoint
async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.watch.snapshot()))
}
