use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use axum::Router;
use serde_json::json;
use std::sync::Arc;

use ovenbird::content::blocks::process::Process;

/// Seeded structured content served on the public API.
pub(crate) struct SiteContent {
    pub(crate) processes: Vec<Process>,
}

pub(crate) fn process_router(content: Arc<SiteContent>) -> Router {
    Router::new()
        .route("/api/v1/processes/:slug", axum::routing::get(process_endpoint))
        .with_state(content)
}

/// Adds the operational endpoints every deployment carries.
pub(crate) fn with_operational_routes(app: Router) -> Router {
    app.route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn process_endpoint(
    State(content): State<Arc<SiteContent>>,
    Path(slug): Path<String>,
) -> Response {
    match content
        .processes
        .iter()
        .find(|process| process.slug == slug)
    {
        Some(process) => (StatusCode::OK, Json(process.clone())).into_response(),
        None => {
            let payload = json!({
                "error": "unknown process",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}
