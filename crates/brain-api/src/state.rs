//! Application state shared across all route handlers.
//!
//! AppState holds the configuration and the service components. It is
//! passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use brain_chat::ChatRouter;
use brain_core::config::BrainConfig;
use brain_insight::{EntityExtractor, TextSummarizer};
use brain_vector::{EmbeddingEngine, SearchEngine};

/// Shared application state.
///
/// Everything here is read-only after startup; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Configuration, used for request defaults.
    pub config: Arc<BrainConfig>,
    /// The embedding engine, already past its one-time load.
    pub engine: Arc<EmbeddingEngine>,
    pub search: SearchEngine,
    pub summarizer: TextSummarizer,
    pub extractor: EntityExtractor,
    pub chat: ChatRouter,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: BrainConfig, engine: EmbeddingEngine, chat: ChatRouter) -> Self {
        let engine = Arc::new(engine);
        Self {
            config: Arc::new(config),
            search: SearchEngine::new(Arc::clone(&engine)),
            engine,
            summarizer: TextSummarizer::new(),
            extractor: EntityExtractor::new(),
            chat,
            start_time: Instant::now(),
        }
    }
}
