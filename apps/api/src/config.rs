use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::matching::bands::RankingPolicy;

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub embedding_model: String,
    /// Local directory holding `config.json`, `tokenizer.json` and
    /// `model.safetensors`. When unset the model is fetched from the hub.
    pub embedding_model_path: Option<PathBuf>,
    pub ranking: RankingPolicy,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let min_similarity = parse_env("MATCH_MIN_SIMILARITY", 0.0_f64)?;

        Ok(Config {
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_model_path: std::env::var("EMBEDDING_MODEL_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            ranking: RankingPolicy {
                min_similarity,
                ..RankingPolicy::default()
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8000_u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let port: u16 = parse_env("MATCHER_TEST_UNSET_PORT", 8000).unwrap();
        assert_eq!(port, 8000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("MATCHER_TEST_BAD_LIMIT", "ten megabytes");
        let result: Result<usize> = parse_env("MATCHER_TEST_BAD_LIMIT", 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_env_reads_float_cutoff() {
        std::env::set_var("MATCHER_TEST_CUTOFF", " 0.25 ");
        let cutoff: f64 = parse_env("MATCHER_TEST_CUTOFF", 0.0).unwrap();
        assert_eq!(cutoff, 0.25);
    }
}
