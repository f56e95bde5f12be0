//! `POST /upload/jobs` body extraction. Accepts both
//! `application/x-www-form-urlencoded` and `multipart/form-data`.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::Deserialize;

use crate::errors::AppError;

/// A validated job upload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company: String,
    pub job_title: String,
    pub description: String,
    pub key: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub skills_required: Option<String>,
    pub experience: Option<String>,
    pub job_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawJobFields {
    company: Option<String>,
    job_title: Option<String>,
    description: Option<String>,
    key: Option<String>,
    location: Option<String>,
    salary: Option<String>,
    skills_required: Option<String>,
    experience: Option<String>,
    job_type: Option<String>,
}

impl RawJobFields {
    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "company" => &mut self.company,
            "job_title" => &mut self.job_title,
            "description" => &mut self.description,
            "key" => &mut self.key,
            "location" => &mut self.location,
            "salary" => &mut self.salary,
            "skills_required" => &mut self.skills_required,
            "experience" => &mut self.experience,
            "job_type" => &mut self.job_type,
            _ => return,
        };
        *slot = Some(value);
    }

    fn validate(self) -> Result<NewJob, AppError> {
        let mut missing = Vec::new();
        let mut required = |value: Option<String>, name: &'static str| match non_blank(value) {
            Some(v) => v,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let company = required(self.company, "company");
        let job_title = required(self.job_title, "job_title");
        let description = required(self.description, "description");
        let key = required(self.key, "key");

        if !missing.is_empty() {
            return Err(AppError::UnprocessableEntity(format!(
                "Missing required form fields: {}",
                missing.join(", ")
            )));
        }

        Ok(NewJob {
            company,
            job_title,
            description,
            key,
            location: non_blank(self.location),
            salary: non_blank(self.salary),
            skills_required: non_blank(self.skills_required),
            experience: non_blank(self.experience),
            job_type: non_blank(self.job_type),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Extractor yielding a validated `NewJob`.
pub struct JobForm(pub NewJob);

#[async_trait]
impl<S> FromRequest<S> for JobForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let fields = if is_multipart {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            let mut fields = RawJobFields::default();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?
            {
                let name = field.name().unwrap_or_default().to_string();
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                fields.set(&name, value);
            }
            fields
        } else {
            let Form(fields) = Form::<RawJobFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            fields
        };

        fields.validate().map(JobForm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn urlencoded(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/upload/jobs")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_urlencoded_form_with_optional_fields() {
        let req = urlencoded(
            "company=Acme&job_title=Rust+Engineer&description=Build+services&key=k1&location=Remote&salary=",
        );
        let JobForm(job) = JobForm::from_request(req, &()).await.unwrap();
        assert_eq!(job.company, "Acme");
        assert_eq!(job.job_title, "Rust Engineer");
        assert_eq!(job.location.as_deref(), Some("Remote"));
        assert_eq!(job.salary, None);
        assert_eq!(job.job_type, None);
    }

    #[tokio::test]
    async fn test_missing_required_fields_are_unprocessable() {
        let req = urlencoded("company=Acme&description=Build+services");
        let err = match JobForm::from_request(req, &()).await {
            Err(e) => e,
            Ok(_) => panic!("expected rejection"),
        };
        match err {
            AppError::UnprocessableEntity(msg) => {
                assert!(msg.contains("job_title"));
                assert!(msg.contains("key"));
                assert!(!msg.contains("company"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_multipart_form_is_accepted() {
        let boundary = "XBOUNDARYX";
        let mut body = String::new();
        for (name, value) in [
            ("company", "Acme"),
            ("job_title", "Platform Engineer"),
            ("description", "Kubernetes and Rust"),
            ("key", "team-a"),
            ("job_type", "Full-time"),
        ] {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        let req = Request::builder()
            .method("POST")
            .uri("/upload/jobs")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let JobForm(job) = JobForm::from_request(req, &()).await.unwrap();
        assert_eq!(job.key, "team-a");
        assert_eq!(job.job_type.as_deref(), Some("Full-time"));
        assert_eq!(job.description, "Kubernetes and Rust");
    }
}
