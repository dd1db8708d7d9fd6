use serde::Serialize;
use utoipa::ToSchema;

pub(crate) mod health_check_controller;
pub(crate) mod upload_controller;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct StatusResponse {
    pub ok: bool,
    pub msg: String,
}
