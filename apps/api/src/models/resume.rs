use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One uploaded resume as persisted in `resumes_meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: String,
    pub user_id: String,
    pub username: String,
    /// Stored file name under the resumes directory, `{id}{ext}`.
    pub filename: String,
    /// Normalized text the embedding was computed from.
    pub text: String,
    pub embedding: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl ResumeRecord {
    pub fn belongs_to(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase()
    }
}
