use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::StatusResponse;

pub(crate) const SERVICE_NAME: &str = "Meeting Summarizer API";

/// GET service status
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service name and liveness flag", body = StatusResponse),
    )
)]
pub async fn index() -> impl IntoResponse {
    Json(StatusResponse {
        ok: true,
        msg: SERVICE_NAME.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}
