//! Axum route handlers for resumes.

use axum::{
    extract::{Multipart, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::resumes::upload::{create_resume, read_resume_upload};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub resume_id: String,
}

/// POST /upload/resume
///
/// Multipart: `user_id`, `username`, `resume` (PDF). Replaces any earlier
/// resume uploaded under the same username.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let upload = read_resume_upload(multipart).await?;
    let resume_id = create_resume(&state, upload).await?;
    Ok(Json(UploadResumeResponse { resume_id }))
}

/// GET /resume/:resume_id
///
/// Streams the stored file back inline as a PDF.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
) -> Result<Response, AppError> {
    let meta = state.store.resumes.load().await?;
    let record = meta
        .get(&resume_id)
        .ok_or_else(|| AppError::NotFound("Resume not found.".to_string()))?;

    let bytes = state
        .store
        .read_document(&state.store.resume_path(&record.filename))
        .await?
        .ok_or_else(|| AppError::NotFound("Resume file missing on server.".to_string()))?;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename={}", record.filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
