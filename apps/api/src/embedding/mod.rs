//! Embedding: the opaque text → vector step.
//!
//! Default: `LocalEmbedder` (candle BERT, sentence-transformers pooling).
//! `AppState` holds an `Arc<dyn Embedder>`; tests swap in a vocabulary embedder.

pub mod local;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Model loading failed: {0}")]
    ModelLoading(String),

    #[error("Model download failed: {0}")]
    ModelDownload(#[from] hf_hub::api::sync::ApiError),

    #[error("Tokenization failed: {0}")]
    Tokenizer(String),

    #[error("Tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("Invalid model configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Inference task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The embedding backend trait. One call per uploaded document.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Length of every vector returned by `embed`.
    fn dimension(&self) -> usize;

    fn model_id(&self) -> &str;
}

/// Embeds `text` and checks the vector has the advertised dimensionality.
pub async fn embed_document(
    embedder: &dyn Embedder,
    text: &str,
) -> Result<Vec<f32>, EmbeddingError> {
    let embedding = embedder.embed(text).await?;
    if embedding.len() != embedder.dimension() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: embedder.dimension(),
            actual: embedding.len(),
        });
    }
    Ok(embedding)
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Deterministic bag-of-words embedder. Every distinct token gets its own
    /// dimension the first time it is seen, so texts sharing no tokens are
    /// orthogonal as long as fewer than `dimension` distinct tokens occur.
    pub struct VocabularyEmbedder {
        pub dimension: usize,
        vocabulary: Mutex<HashMap<String, usize>>,
    }

    impl Default for VocabularyEmbedder {
        fn default() -> Self {
            Self {
                dimension: 384,
                vocabulary: Mutex::new(HashMap::new()),
            }
        }
    }

    impl VocabularyEmbedder {
        fn slot(&self, token: &str) -> usize {
            let mut vocabulary = self.vocabulary.lock().unwrap();
            let next = vocabulary.len();
            *vocabulary.entry(token.to_string()).or_insert(next) % self.dimension
        }
    }

    #[async_trait]
    impl Embedder for VocabularyEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let mut vector = vec![0.0_f32; self.dimension];
            for token in text.split_whitespace() {
                vector[self.slot(token)] += 1.0;
            }
            Ok(vector)
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn model_id(&self) -> &str {
            "vocabulary-test"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::VocabularyEmbedder;
    use super::*;

    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![1.0, 2.0, 3.0])
        }

        fn dimension(&self) -> usize {
            384
        }

        fn model_id(&self) -> &str {
            "short"
        }
    }

    #[tokio::test]
    async fn test_embed_document_rejects_wrong_dimension() {
        let err = embed_document(&ShortEmbedder, "rust").await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 384,
                actual: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_vocabulary_embedder_is_deterministic() {
        let embedder = VocabularyEmbedder::default();
        let a = embed_document(&embedder, "rust axum tokio").await.unwrap();
        let b = embed_document(&embedder, "rust axum tokio").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 384);
    }

    #[tokio::test]
    async fn test_disjoint_texts_are_orthogonal() {
        let embedder = VocabularyEmbedder::default();
        let a = embed_document(&embedder, "rust services kubernetes").await.unwrap();
        let b = embed_document(&embedder, "figma prototypes").await.unwrap();
        let dot: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        assert_eq!(dot, 0.0);
    }
}
