//! Axum route handlers for the Matching API.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::bands::MatchLabel;
use crate::matching::ranking::rank;
use crate::models::job::JobSummary;
use crate::state::AppState;

const DEFAULT_MATCH_COUNT: i64 = 5;

fn default_count() -> i64 {
    DEFAULT_MATCH_COUNT
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CandidateMatchQuery {
    pub jobid: String,
    #[serde(default = "default_count")]
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct JobMatchQuery {
    #[serde(rename = "resumeId")]
    pub resume_id: String,
    #[serde(default = "default_count")]
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct CandidateMatch {
    pub user_id: String,
    pub username: String,
    /// Stored resume filename.
    pub resume: String,
    pub accuracy: f64,
    #[serde(rename = "match")]
    pub label: MatchLabel,
}

#[derive(Debug, Serialize)]
pub struct CandidateMatchResponse {
    pub job: JobSummary,
    pub candidates: Vec<CandidateMatch>,
}

#[derive(Debug, Serialize)]
pub struct JobMatch {
    pub job_id: String,
    pub company: String,
    pub job_title: String,
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub skills_required: Option<String>,
    pub experience: Option<String>,
    pub job_type: Option<String>,
    pub accuracy: f64,
    #[serde(rename = "match")]
    pub label: MatchLabel,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    pub resume_id: String,
    pub username: String,
    pub matches: Vec<JobMatch>,
}

/// Missing or malformed query parameters are validation failures (422).
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::UnprocessableEntity(rejection.body_text()))
}

fn require_positive(count: i64) -> Result<usize, AppError> {
    match usize::try_from(count) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(AppError::UnprocessableEntity(
            "count must be greater than 0".to_string(),
        )),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /match/candidates?jobid=&count=
///
/// Ranks every stored resume against one job.
pub async fn handle_match_candidates(
    State(state): State<AppState>,
    query: Result<Query<CandidateMatchQuery>, QueryRejection>,
) -> Result<Json<CandidateMatchResponse>, AppError> {
    let params = query_params(query)?;
    let count = require_positive(params.count)?;
    let jobs = state.store.jobs.load().await?;
    let resumes = state.store.resumes.load().await?;

    let job = jobs
        .get(&params.jobid)
        .ok_or_else(|| AppError::NotFound("Job ID not found.".to_string()))?;

    let ranked = rank(
        &job.embedding,
        resumes
            .iter()
            .map(|(id, resume)| (id.as_str(), resume.embedding.as_slice())),
        state.ranking.min_similarity,
        count,
    )?;

    let candidates: Vec<CandidateMatch> = ranked
        .into_iter()
        .filter_map(|m| {
            let resume = resumes.get(&m.id)?;
            let (accuracy, label) = state.ranking.grade(m.similarity);
            Some(CandidateMatch {
                user_id: resume.user_id.clone(),
                username: resume.username.clone(),
                resume: resume.filename.clone(),
                accuracy,
                label,
            })
        })
        .collect();

    info!(
        "Matched job {} against {} resumes: {} candidates returned",
        job.id,
        resumes.len(),
        candidates.len()
    );

    Ok(Json(CandidateMatchResponse {
        job: JobSummary::from(job),
        candidates,
    }))
}

/// GET /match/jobs?resumeId=&count=
///
/// Ranks every stored job against one resume.
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    query: Result<Query<JobMatchQuery>, QueryRejection>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let params = query_params(query)?;
    let count = require_positive(params.count)?;
    let resumes = state.store.resumes.load().await?;
    let jobs = state.store.jobs.load().await?;

    let resume = resumes
        .get(&params.resume_id)
        .ok_or_else(|| AppError::NotFound("Resume ID not found.".to_string()))?;

    let ranked = rank(
        &resume.embedding,
        jobs.iter()
            .map(|(id, job)| (id.as_str(), job.embedding.as_slice())),
        state.ranking.min_similarity,
        count,
    )?;

    let matches: Vec<JobMatch> = ranked
        .into_iter()
        .filter_map(|m| {
            let job = jobs.get(&m.id)?;
            let (accuracy, label) = state.ranking.grade(m.similarity);
            Some(JobMatch {
                job_id: m.id,
                company: job.company.clone(),
                job_title: job.job_title.clone(),
                description: job.description.clone(),
                location: job.location.clone(),
                salary: job.salary.clone(),
                skills_required: job.skills_required.clone(),
                experience: job.experience.clone(),
                job_type: job.job_type.clone(),
                accuracy,
                label,
            })
        })
        .collect();

    info!(
        "Matched resume {} against {} jobs: {} matches returned",
        resume.id,
        jobs.len(),
        matches.len()
    );

    Ok(Json(JobMatchResponse {
        resume_id: params.resume_id,
        username: resume.username.clone(),
        matches,
    }))
}
