use std::sync::Arc;

use crate::embedding::Embedder;
use crate::matching::bands::RankingPolicy;
use crate::store::DataStore;
use crate::text::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: DataStore,
    /// Pluggable embedder. Default: LocalEmbedder (candle BERT).
    pub embedder: Arc<dyn Embedder>,
    /// Pluggable document-to-text backend. Default: PdfTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
    pub ranking: RankingPolicy,
}
