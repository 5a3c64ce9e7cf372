// ============================================================================
// Status, Health and Metrics Routes
// ============================================================================
//
// Endpoints:
// - GET /status      - store liveness plus the dependency registry
// - GET /health/live - process liveness, no dependency checks
// - GET /metrics     - Prometheus metrics
//
// None of these require a session.
//
// ============================================================================

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use msgstore_types::DependencyReport;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::ServiceContext;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub statuscode: u16,
    pub running: bool,
    pub deps: DependencyReport,
}

/// GET /status
///
/// 503 when the store does not answer its ping. Collaborators reported down
/// by the registry are listed but do not change the status code.
pub async fn status(State(ctx): State<Arc<ServiceContext>>) -> impl IntoResponse {
    let store = ctx.store.status().await;

    let mut deps = store.deps;
    deps.merge(ctx.status.snapshot().await);

    let code = if store.running {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(StatusResponse {
            statuscode: code.as_u16(),
            running: store.running,
            deps,
        }),
    )
}

/// GET /health/live
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    match msgstore_metrics::gather_metrics() {
        Ok(metrics_data) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            metrics_data,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to gather metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("Content-Type", "text/plain")],
                "Internal Server Error".to_string(),
            )
        }
    }
}
