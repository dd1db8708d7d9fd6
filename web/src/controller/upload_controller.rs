use crate::controller::ErrorResponse;
use crate::{AppState, Error, Result};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};
use domain::pipeline::{self, PipelineConfig, PipelineResult};
use domain::upload::{UploadStore, UploadedFile};

use log::*;

/// Multipart field carrying the recording.
const FILE_FIELD: &str = "file";

/// POST a meeting recording for transcription and summarization
#[utoipa::path(
    post,
    path = "/upload",
    request_body(
        content_type = "multipart/form-data",
        description = "A single audio or video file in the `file` field"
    ),
    responses(
        (status = 200, description = "Successfully transcribed and summarized the recording", body = PipelineResult),
        (status = 400, description = "No file in the request or malformed multipart body", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the configured size limit", body = ErrorResponse),
        (status = 500, description = "Storing, transcribing or summarizing the recording failed", body = ErrorResponse),
    )
)]
pub async fn upload(
    State(app_state): State<AppState>,
    multipart: core::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    // A request that is not multipart at all carries no file either.
    let Ok(mut multipart) = multipart else {
        return Err(no_file_uploaded());
    };

    let store = UploadStore::new(app_state.config.upload_dir());
    let mut uploaded: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(receive_error)? {
        // Only file parts named `file` count; plain form fields are ignored.
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }
        if uploaded.is_some() {
            return Err(DomainError::validation("Only one file may be uploaded").into());
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        uploaded = Some(store.store(&original_name, field).await?);
    }

    let Some(uploaded) = uploaded else {
        return Err(no_file_uploaded());
    };
    info!("Received file: {}", uploaded.stored_path.display());

    let result = pipeline::run(&uploaded, &PipelineConfig::from(&app_state.config)).await?;

    debug!("Pipeline finished for {}", result.filename);

    Ok(Json(result))
}

fn no_file_uploaded() -> Error {
    DomainError::validation("No file uploaded").into()
}

fn receive_error(err: MultipartError) -> Error {
    DomainError {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Upload),
    }
    .into()
}
