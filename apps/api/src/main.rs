mod config;
mod embedding;
mod errors;
mod jobs;
mod matching;
mod models;
mod resumes;
mod routes;
mod state;
mod store;
mod text;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{Embedder, LocalEmbedder};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::DataStore;
use crate::text::PdfTextExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize flat-file storage
    let store = DataStore::new(&config.data_dir);
    store.ensure_layout().await?;

    // Initialize embedding model (blocking: may download weights)
    let embedder = load_embedder(&config).await?;
    info!(
        "Embedder initialized (model: {}, dimension: {})",
        embedder.model_id(),
        embedder.dimension()
    );

    info!(
        "Ranking policy: similarity cutoff {} with bands {:?}",
        config.ranking.min_similarity, config.ranking.bands
    );

    let state = AppState {
        store,
        embedder: Arc::new(embedder),
        extractor: Arc::new(PdfTextExtractor),
        ranking: config.ranking.clone(),
    };

    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the sentence embedder from a local directory when configured,
/// otherwise from the Hugging Face Hub cache.
async fn load_embedder(config: &Config) -> Result<LocalEmbedder> {
    let model_path = config.embedding_model_path.clone();
    let model_id = config.embedding_model.clone();
    tokio::task::spawn_blocking(move || match model_path {
        Some(dir) => LocalEmbedder::from_dir(&dir),
        None => LocalEmbedder::from_hub(&model_id),
    })
    .await?
    .context("Failed to load embedding model")
}
