use chrono::Utc;
use tracing::info;

use crate::embedding::embed_document;
use crate::errors::AppError;
use crate::jobs::form::NewJob;
use crate::models::job::JobRecord;
use crate::models::new_document_id;
use crate::state::AppState;
use crate::text::normalize;

/// Stores a job posting: description file, normalized text, embedding and
/// metadata entry. Returns the new job id.
pub async fn create_job(state: &AppState, job: NewJob) -> Result<String, AppError> {
    let mut meta = state.store.jobs.load().await?;

    let mut id = new_document_id();
    while meta.contains_key(&id) {
        id = new_document_id();
    }
    let filename = format!("{id}.txt");

    state
        .store
        .write_document(&state.store.job_path(&filename), job.description.as_bytes())
        .await?;

    let text = normalize(&job.description);
    let embedding = embed_document(state.embedder.as_ref(), &text).await?;

    let NewJob {
        company,
        job_title,
        description,
        key,
        location,
        salary,
        skills_required,
        experience,
        job_type,
    } = job;

    info!("Stored job {id} ({job_title} at {company})");

    meta.insert(
        id.clone(),
        JobRecord {
            id: id.clone(),
            company,
            job_title,
            description,
            location,
            salary,
            skills_required,
            experience,
            job_type,
            filename,
            text,
            embedding,
            key,
            uploaded_at: Some(Utc::now()),
        },
    );
    state.store.jobs.save(&meta).await?;

    Ok(id)
}
