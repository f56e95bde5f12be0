use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One job posting as persisted in `jds_meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub company: String,
    pub job_title: String,
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub skills_required: Option<String>,
    pub experience: Option<String>,
    pub job_type: Option<String>,
    /// Stored description file under the job descriptions directory, `{id}.txt`.
    pub filename: String,
    /// Normalized description the embedding was computed from.
    pub text: String,
    pub embedding: Vec<f32>,
    /// Caller-supplied key used to group postings for `GET /jobs`.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Public view of a job returned by `GET /job/{id}` and `GET /jobs`.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub job_id: String,
    pub company: String,
    pub job_title: String,
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub skills_required: Option<String>,
    pub experience: Option<String>,
    pub job_type: Option<String>,
    pub filename: String,
    pub key: String,
}

impl From<&JobRecord> for JobView {
    fn from(job: &JobRecord) -> Self {
        Self {
            job_id: job.id.clone(),
            company: job.company.clone(),
            job_title: job.job_title.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            salary: job.salary.clone(),
            skills_required: job.skills_required.clone(),
            experience: job.experience.clone(),
            job_type: job.job_type.clone(),
            filename: job.filename.clone(),
            key: job.key.clone(),
        }
    }
}

/// Job summary embedded in candidate-match responses.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub skills_required: Option<String>,
    pub experience: Option<String>,
    pub job_type: Option<String>,
}

impl From<&JobRecord> for JobSummary {
    fn from(job: &JobRecord) -> Self {
        Self {
            job_id: job.id.clone(),
            job_title: job.job_title.clone(),
            company: job.company.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            salary: job.salary.clone(),
            skills_required: job.skills_required.clone(),
            experience: job.experience.clone(),
            job_type: job.job_type.clone(),
        }
    }
}
