// Resumes: PDF upload with per-username replacement, and file download.

pub mod handlers;
pub mod upload;
