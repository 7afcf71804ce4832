//! The embedding engine: one model, loaded once, shared read-only.
//!
//! The engine moves `Unloaded -> Loaded | FailedToLoad` exactly once. The
//! composition root performs the load before it starts serving, then wraps
//! the engine in an `Arc`; no transition is possible after that because
//! [`EmbeddingEngine::load`] takes `self` by value.

use std::fmt;

use brain_core::config::EmbeddingConfig;
use brain_core::error::{BrainError, Result};
use brain_core::types::{Embeddings, ModelHealth, Vector};
use tracing::{info, warn};

use crate::embedding::{DynEmbeddingService, EmbeddingService, MockEmbedding, OnnxEmbeddingService};

/// Lifecycle of the embedding model.
pub enum ModelState {
    Unloaded,
    Loaded {
        service: Box<dyn DynEmbeddingService>,
        dimension: usize,
    },
    FailedToLoad {
        reason: String,
    },
}

impl ModelState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loaded { .. } => "loaded",
            Self::FailedToLoad { .. } => "failed_to_load",
        }
    }
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unloaded => f.write_str("Unloaded"),
            Self::Loaded { dimension, .. } => {
                f.debug_struct("Loaded").field("dimension", dimension).finish()
            }
            Self::FailedToLoad { reason } => {
                f.debug_struct("FailedToLoad").field("reason", reason).finish()
            }
        }
    }
}

/// Owns the embedding model and turns texts into vectors.
#[derive(Debug)]
pub struct EmbeddingEngine {
    model_id: String,
    state: ModelState,
}

impl EmbeddingEngine {
    /// Create an engine in the `Unloaded` state.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            state: ModelState::Unloaded,
        }
    }

    /// Run the one-time model load.
    ///
    /// A loader error moves the engine to `FailedToLoad`; the error is logged
    /// and kept for health reporting, never returned. Calling `load` on an
    /// engine that already left `Unloaded` leaves it unchanged.
    pub fn load<F>(mut self, loader: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn DynEmbeddingService>>,
    {
        if !matches!(self.state, ModelState::Unloaded) {
            warn!(
                model = %self.model_id,
                state = self.state.name(),
                "Embedding model load requested twice; ignoring"
            );
            return self;
        }

        self.state = match loader() {
            Ok(service) => {
                let dimension = service.dimensions();
                info!(model = %self.model_id, dimension, "Embedding model loaded");
                ModelState::Loaded { service, dimension }
            }
            Err(e) => {
                warn!(model = %self.model_id, error = %e, "Could not load embedding model");
                ModelState::FailedToLoad {
                    reason: e.to_string(),
                }
            }
        };
        self
    }

    /// Build and load an engine from configuration.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        let backend = config.backend.clone();
        let model_dir = config.resolved_model_dir();
        info!(model = %config.model, backend = %backend, dir = %model_dir.display(), "Loading embedding model");

        Self::new(config.model.clone()).load(move || match backend.as_str() {
            "mock" => Ok(Box::new(MockEmbedding::new()) as Box<dyn DynEmbeddingService>),
            "onnx" => Ok(Box::new(OnnxEmbeddingService::from_directory(&model_dir)?)),
            other => Err(BrainError::Config(format!(
                "unknown embedding backend '{}'",
                other
            ))),
        })
    }

    /// Convenience constructor: an engine already loaded with `service`.
    pub fn with_service(model_id: impl Into<String>, service: impl EmbeddingService + 'static) -> Self {
        Self::new(model_id).load(move || Ok(Box::new(service)))
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ModelState::Loaded { .. })
    }

    /// Output dimension of the loaded model, if any.
    pub fn dimension(&self) -> Option<usize> {
        match self.state {
            ModelState::Loaded { dimension, .. } => Some(dimension),
            _ => None,
        }
    }

    pub fn health(&self) -> ModelHealth {
        ModelHealth {
            model_loaded: self.is_loaded(),
            embedding_dimension: self.dimension(),
        }
    }

    fn service(&self) -> Result<(&dyn DynEmbeddingService, usize)> {
        match &self.state {
            ModelState::Loaded { service, dimension } => Ok((service.as_ref(), *dimension)),
            ModelState::Unloaded => Err(BrainError::ServiceUnavailable(
                "embedding model not loaded".to_string(),
            )),
            ModelState::FailedToLoad { reason } => Err(BrainError::ServiceUnavailable(format!(
                "embedding model failed to load: {}",
                reason
            ))),
        }
    }

    /// Embed a non-empty batch of texts, one vector per text, in order.
    pub async fn embed(&self, texts: &[String]) -> Result<Embeddings> {
        if texts.is_empty() {
            return Err(BrainError::Validation(
                "embed: texts must not be empty".to_string(),
            ));
        }
        let (service, dimension) = self.service()?;

        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(embed_checked(service, dimension, text).await?);
        }

        Ok(Embeddings { vectors, dimension })
    }

    /// Embed a single text.
    pub async fn embed_one(&self, text: &str) -> Result<Vector> {
        let (service, dimension) = self.service()?;
        embed_checked(service, dimension, text).await
    }
}

async fn embed_checked(
    service: &dyn DynEmbeddingService,
    dimension: usize,
    text: &str,
) -> Result<Vector> {
    let vector = service.embed_boxed(text).await?;
    if vector.len() != dimension {
        return Err(BrainError::Internal(format!(
            "embed: model produced dimension {}, expected {}",
            vector.len(),
            dimension
        )));
    }
    Ok(vector)
}
