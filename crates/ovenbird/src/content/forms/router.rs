use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use serde_json::json;

use super::builder::SubmissionPayload;
use super::service::{FormError, FormSubmissionService};
use super::submissions::{FormNotifier, SubmissionRepository};

/// Router builder exposing the public form endpoints: GET renders the grouped
/// form, POST submits answers.
pub fn form_router<R, N>(service: Arc<FormSubmissionService<R, N>>) -> Router
where
    R: SubmissionRepository + 'static,
    N: FormNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/forms/:slug",
            get(render_handler::<R, N>).post(submit_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn render_handler<R, N>(
    State(service): State<Arc<FormSubmissionService<R, N>>>,
    Path(slug): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    N: FormNotifier + 'static,
{
    match service.render(&slug) {
        Ok(model) => (StatusCode::OK, axum::Json(model)).into_response(),
        Err(FormError::UnknownForm(slug)) => {
            let payload = json!({
                "error": format!("unknown form '{slug}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<FormSubmissionService<R, N>>>,
    Path(slug): Path<String>,
    axum::Json(payload): axum::Json<SubmissionPayload>,
) -> Response
where
    R: SubmissionRepository + 'static,
    N: FormNotifier + 'static,
{
    let submitted_at = Local::now().naive_local();
    match service.submit(&slug, &payload, submitted_at) {
        Ok(receipt) => (StatusCode::ACCEPTED, axum::Json(receipt)).into_response(),
        Err(FormError::UnknownForm(slug)) => {
            let payload = json!({
                "error": format!("unknown form '{slug}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(FormError::Rejected { issues }) => {
            let payload = json!({
                "errors": issues,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
