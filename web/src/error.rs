use std::error::Error as StdError;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};
use log::*;

use crate::controller::ErrorResponse;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Domain(DomainError),
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::Domain(err) => write!(fmt, "{err}"),
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        let Error::Domain(err) = self;
        match &err.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Validation(_)) => StatusCode::BAD_REQUEST,
            // The multipart error knows whether the body was malformed or too large.
            DomainErrorKind::Internal(InternalErrorKind::Upload) => err
                .source
                .as_ref()
                .and_then(|source| source.downcast_ref::<MultipartError>())
                .map(MultipartError::status)
                .unwrap_or(StatusCode::BAD_REQUEST),
            DomainErrorKind::Internal(_) | DomainErrorKind::External(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Every error leaves the API as `{ "error": <message> }`.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let Error::Domain(err) = &self;

        if status.is_server_error() {
            match err.upstream_body() {
                Some(body) => error!("Upload error: {err} (upstream response: {body})"),
                None => error!("Upload error: {err}"),
            }
        } else {
            warn!("Rejected upload request ({status}): {err}");
        }

        (
            status,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self::Domain(err.into())
    }
}
