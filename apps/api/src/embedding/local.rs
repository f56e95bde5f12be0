//! Local sentence embedder built on candle's BERT implementation.
//!
//! Mirrors sentence-transformers for MiniLM-style models: truncate to 256
//! tokens, mean-pool the last hidden state over the attention mask, then
//! L2-normalize.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::api::sync::Api;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{info, warn};

use super::{Embedder, EmbeddingError};

const MAX_SEQ_LEN: usize = 256;

struct BertEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl BertEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        // (1, seq, hidden)
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling over real tokens only
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9_f32, f32::MAX)?;
        let pooled = summed.broadcast_div(&counts)?;

        let norm = pooled
            .sqr()?
            .sum_keepdim(1)?
            .sqrt()?
            .clamp(1e-12_f32, f32::MAX)?;
        let normalized = pooled.broadcast_div(&norm)?;

        Ok(normalized.squeeze(0)?.to_vec1::<f32>()?)
    }
}

/// BERT-family sentence embedder running on the local machine.
#[derive(Clone)]
pub struct LocalEmbedder {
    encoder: Arc<BertEncoder>,
    model_id: String,
    dimension: usize,
}

impl std::fmt::Debug for LocalEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEmbedder")
            .field("model_id", &self.model_id)
            .field("dimension", &self.dimension)
            .field("device", &self.encoder.device)
            .finish()
    }
}

impl LocalEmbedder {
    /// Downloads (or reuses the cached copy of) `model_id` from the Hugging Face Hub.
    pub fn from_hub(model_id: &str) -> Result<Self, EmbeddingError> {
        info!("Fetching embedding model {model_id} from the hub...");
        let repo = Api::new()?.model(model_id.to_string());
        let files = ModelFiles {
            config: repo.get("config.json")?,
            tokenizer: repo.get("tokenizer.json")?,
            weights: repo.get("model.safetensors")?,
        };
        Self::load(model_id, files)
    }

    /// Loads a model from a directory holding `config.json`, `tokenizer.json`
    /// and `model.safetensors`.
    pub fn from_dir(dir: &Path) -> Result<Self, EmbeddingError> {
        let files = ModelFiles {
            config: require_file(dir, "config.json")?,
            tokenizer: require_file(dir, "tokenizer.json")?,
            weights: require_file(dir, "model.safetensors")?,
        };
        Self::load(&dir.display().to_string(), files)
    }

    fn load(model_id: &str, files: ModelFiles) -> Result<Self, EmbeddingError> {
        let device = Device::cuda_if_available(0).unwrap_or_else(|e| {
            warn!("CUDA not available ({e}), falling back to CPU");
            Device::Cpu
        });

        let config: Config = serde_json::from_str(&std::fs::read_to_string(&files.config)?)?;
        let dimension = config.hidden_size;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| EmbeddingError::ModelLoading(format!("Failed to load tokenizer: {e}")))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let vb = load_weights(&files.weights, &device)?;
        let model = BertModel::load(vb, &config)?;

        info!("Embedding model {model_id} loaded (dimension {dimension})");

        Ok(Self {
            encoder: Arc::new(BertEncoder {
                model,
                tokenizer,
                device,
            }),
            model_id: model_id.to_string(),
            dimension,
        })
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoder = Arc::clone(&self.encoder);
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || encoder.encode(&text)).await?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

struct ModelFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

/// Reads the safetensors weights into memory and wraps them in a `VarBuilder`.
fn load_weights(path: &Path, device: &Device) -> Result<VarBuilder<'static>, EmbeddingError> {
    let bytes = std::fs::read(path)?;
    Ok(VarBuilder::from_buffered_safetensors(bytes, DType::F32, device)?)
}

fn require_file(dir: &Path, name: &str) -> Result<PathBuf, EmbeddingError> {
    let path = dir.join(name);
    if !path.exists() {
        return Err(EmbeddingError::ModelLoading(format!(
            "{} not found. Please ensure the model is properly downloaded.",
            path.display()
        )));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir_reports_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = LocalEmbedder::from_dir(dir.path()).unwrap_err();
        match err {
            EmbeddingError::ModelLoading(msg) => assert!(msg.contains("config.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_corrupt_weights_are_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("model.safetensors");
        std::fs::write(&path, b"definitely not safetensors").unwrap();
        let result = load_weights(&path, &Device::Cpu);
        assert!(matches!(result, Err(EmbeddingError::Tensor(_))));
    }

    #[test]
    fn test_missing_weights_are_an_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_weights(&dir.path().join("model.safetensors"), &Device::Cpu);
        assert!(matches!(result, Err(EmbeddingError::Io(_))));
    }
}
