pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/upload/jobs", post(jobs::handle_upload_job))
        .route("/job/:job_id", get(jobs::handle_get_job))
        .route("/jobs", get(jobs::handle_list_jobs))
        // Resumes
        .route("/upload/resume", post(resumes::handle_upload_resume))
        .route("/resume/:resume_id", get(resumes::handle_get_resume))
        // Matching
        .route("/match/candidates", get(matching::handle_match_candidates))
        .route("/match/jobs", get(matching::handle_match_jobs))
        .with_state(state)
}
