//! Text pipeline front half: document bytes → raw text → normalized text.

pub mod normalize;
pub mod stopwords;

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

pub use normalize::normalize;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Pulls plain text out of an uploaded document.
///
/// Carried in `AppState` as `Arc<dyn TextExtractor>` so tests can swap the
/// PDF backend for a plain UTF-8 decoder.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, TextError>;
}

/// Default extractor backed by the `pdf-extract` crate.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, TextError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| TextError::Pdf(e.to_string()))
    }
}

/// Runs extraction on the blocking pool. A panicking PDF backend surfaces as
/// `TextError::Task` instead of taking down the worker.
pub async fn extract_text(
    extractor: Arc<dyn TextExtractor>,
    bytes: Bytes,
) -> Result<String, TextError> {
    tokio::task::spawn_blocking(move || extractor.extract(&bytes)).await?
}
