//! Axum route handlers for job postings.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::form::JobForm;
use crate::jobs::ingest::create_job;
use crate::models::job::JobView;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadJobResponse {
    pub job_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct KeyQuery {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobView>,
    pub count: usize,
}

/// POST /upload/jobs
pub async fn handle_upload_job(
    State(state): State<AppState>,
    JobForm(job): JobForm,
) -> Result<Json<UploadJobResponse>, AppError> {
    let job_id = create_job(&state, job).await?;
    Ok(Json(UploadJobResponse {
        job_id,
        message: "Job uploaded successfully.".to_string(),
    }))
}

/// GET /job/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobView>, AppError> {
    let meta = state.store.jobs.load().await?;
    let job = meta
        .get(&job_id)
        .ok_or_else(|| AppError::NotFound("Job ID not found.".to_string()))?;
    Ok(Json(JobView::from(job)))
}

/// GET /jobs?key=
///
/// Lists every job uploaded under exactly `key`.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<KeyQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let meta = state.store.jobs.load().await?;
    let jobs: Vec<JobView> = meta
        .values()
        .filter(|job| job.key == params.key)
        .map(JobView::from)
        .collect();
    Ok(Json(JobListResponse {
        count: jobs.len(),
        jobs,
    }))
}
