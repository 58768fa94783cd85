//! HTTP delivery surface — notification intake and liveness probes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use scalegate_common::config::ProbeConfig;
use scalegate_common::notification::LifecycleNotification;

use crate::application::services::confirm;
use crate::infra::aws::AwsCli;
use crate::infra::clock::SystemClock;
use crate::infra::command_runner::TokioCommandRunner;

/// Shared state: the production adapters plus the probe configuration.
pub struct AppState {
    aws: AwsCli<TokioCommandRunner>,
    clock: SystemClock,
    probe: ProbeConfig,
}

impl AppState {
    #[must_use]
    pub fn new(probe: ProbeConfig) -> Self {
        Self {
            aws: AwsCli::default_runner(),
            clock: SystemClock::new(),
            probe,
        }
    }
}

/// Compose the router:
///   - `POST /lifecycle` → notification intake
///   - `GET /health`     → load-balancer liveness probe
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/lifecycle", post(confirm_handler))
        .route("/health", get(health))
        .with_state(state)
}

/// Minimal health-check handler for load-balancer probes.
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Run one confirmation invocation for an inbound notification.
///
/// The response body is the invocation result: the bare readiness verdict,
/// or the fixed error string for rejected notifications. Propagated workflow
/// failures surface as 500 so the eventing boundary can retry or alert.
async fn confirm_handler(
    State(state): State<Arc<AppState>>,
    Json(notification): Json<LifecycleNotification>,
) -> Response {
    tracing::info!(
        records = notification.records.len(),
        "lifecycle notification received"
    );
    match confirm::confirm_launch(
        &state.aws,
        &state.aws,
        &state.clock,
        &state.probe,
        &notification,
    )
    .await
    {
        Ok(outcome) => {
            tracing::info!(%outcome, "confirmation finished");
            (StatusCode::OK, Json(outcome.body())).into_response()
        }
        Err(err) => {
            tracing::error!("confirmation workflow failed: {err:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
