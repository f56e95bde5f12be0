//! Resume ingestion: multipart parsing, per-username replacement, then
//! extract → normalize → embed → persist.

use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use crate::embedding::embed_document;
use crate::errors::AppError;
use crate::models::new_document_id;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::store::{DataStore, MetaMap, StoreError};
use crate::text::{extract_text, normalize};

const PDF_MIME: &str = "application/pdf";

/// A parsed `POST /upload/resume` body.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub user_id: String,
    pub username: String,
    pub original_filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeUpload {
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
    }

    /// Extension of the uploaded file including the dot, `.pdf` when absent.
    pub fn extension(&self) -> String {
        self.original_filename
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| ".pdf".to_string())
    }
}

/// Reads `user_id`, `username` and the `resume` file part.
pub async fn read_resume_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut user_id = None;
    let mut username = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "user_id" => {
                user_id = Some(field.text().await.map_err(|e| AppError::Validation(e.body_text()))?)
            }
            "username" => {
                username = Some(field.text().await.map_err(|e| AppError::Validation(e.body_text()))?)
            }
            "resume" => {
                let original_filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                file = Some((original_filename, content_type, bytes));
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    if user_id.as_deref().map_or(true, |u| u.trim().is_empty()) {
        missing.push("user_id");
    }
    if username.as_deref().map_or(true, |u| u.trim().is_empty()) {
        missing.push("username");
    }
    if file.is_none() {
        missing.push("resume");
    }
    match (user_id, username, file) {
        (Some(user_id), Some(username), Some((original_filename, content_type, bytes)))
            if missing.is_empty() =>
        {
            Ok(ResumeUpload {
                user_id,
                username,
                original_filename,
                content_type,
                bytes,
            })
        }
        _ => Err(AppError::UnprocessableEntity(format!(
            "Missing required form fields: {}",
            missing.join(", ")
        ))),
    }
}

/// Drops every record owned by `username` (case-insensitive) from `meta` and
/// deletes its stored file. Returns the ids that were removed.
pub async fn remove_previous_uploads(
    store: &DataStore,
    meta: &mut MetaMap<ResumeRecord>,
    username: &str,
) -> Result<Vec<String>, StoreError> {
    let previous: Vec<String> = meta
        .values()
        .filter(|record| record.belongs_to(username))
        .map(|record| record.id.clone())
        .collect();

    for id in &previous {
        if let Some(old) = meta.shift_remove(id) {
            let path = store.resume_path(&old.filename);
            if !store.remove_document(&path).await? {
                warn!("Resume file {} for {id} was already missing", path.display());
            }
            info!("Replacing resume {id} for username {username}");
        }
    }
    Ok(previous)
}

/// Stores an uploaded resume and returns its new id.
///
/// Earlier uploads under the same username are only removed once the new
/// document has been extracted and embedded, so a failed upload leaves them
/// in place.
pub async fn create_resume(state: &AppState, upload: ResumeUpload) -> Result<String, AppError> {
    if !upload.is_pdf() {
        return Err(AppError::Validation("Only PDF resumes allowed.".to_string()));
    }

    let raw = extract_text(state.extractor.clone(), upload.bytes.clone()).await?;
    let text = normalize(&raw);
    let embedding = embed_document(state.embedder.as_ref(), &text).await?;

    let mut meta = state.store.resumes.load().await?;
    let mut id = new_document_id();
    while meta.contains_key(&id) {
        id = new_document_id();
    }
    remove_previous_uploads(&state.store, &mut meta, &upload.username).await?;

    let filename = format!("{id}{}", upload.extension());
    state
        .store
        .write_document(&state.store.resume_path(&filename), &upload.bytes)
        .await?;

    info!(
        "Stored resume {id} for {} ({} bytes, {} normalized chars)",
        upload.username,
        upload.bytes.len(),
        text.len()
    );

    meta.insert(
        id.clone(),
        ResumeRecord {
            id: id.clone(),
            user_id: upload.user_id,
            username: upload.username,
            filename,
            text,
            embedding,
            uploaded_at: Some(Utc::now()),
        },
    );
    state.store.resumes.save(&meta).await?;

    Ok(id)
}
