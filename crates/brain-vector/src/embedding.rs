//! Embedding backends.
//!
//! - `OnnxEmbeddingService` loads a sentence-transformer ONNX export (e.g.
//!   bge-small-en-v1.5) via ort and tokenizes with the HuggingFace tokenizers
//!   crate. This is the production backend.
//! - `MockEmbedding` returns deterministic hash-based vectors for development
//!   and tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Arc, Mutex};

use brain_core::error::BrainError;
use ort::session::Session;
use ort::value::TensorRef;
use tokenizers::Tokenizer;
use tracing::info;

/// Service for turning a single text into a fixed-dimensional vector.
pub trait EmbeddingService: Send + Sync {
    /// Generate an embedding vector for the given text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, BrainError>> + Send;

    /// Return the dimensionality of vectors produced by this service.
    fn dimensions(&self) -> usize;
}

/// Object-safe version of [`EmbeddingService`].
///
/// `EmbeddingService::embed` returns `impl Future`, which rules out
/// `dyn EmbeddingService`. This trait boxes the future so the engine can hold
/// whichever backend the config selected.
pub trait DynEmbeddingService: Send + Sync {
    fn embed_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, BrainError>> + Send + 'a>>;

    fn dimensions(&self) -> usize;
}

impl<T: EmbeddingService> DynEmbeddingService for T {
    fn embed_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, BrainError>> + Send + 'a>> {
        Box::pin(self.embed(text))
    }

    fn dimensions(&self) -> usize {
        EmbeddingService::dimensions(self)
    }
}

// ---------------------------------------------------------------------------
// OnnxEmbeddingService
// ---------------------------------------------------------------------------

/// ONNX Runtime-backed embedding service using a sentence-transformer model.
///
/// Expects a model directory containing:
/// - `model.onnx` - the sentence-transformer ONNX export
/// - `tokenizer.json` - the HuggingFace fast-tokenizer file
///
/// The model takes `input_ids`, `attention_mask` and `token_type_ids` as i64
/// inputs and yields token-level embeddings, which are mean-pooled under the
/// attention mask and L2-normalized.
pub struct OnnxEmbeddingService {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    dimensions: usize,
}

// ort::Session is Send + Sync internally (uses Arc<SharedSessionInner>).
unsafe impl Send for OnnxEmbeddingService {}
unsafe impl Sync for OnnxEmbeddingService {}

impl std::fmt::Debug for OnnxEmbeddingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingService")
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl OnnxEmbeddingService {
    /// Load a model from a directory holding `model.onnx` and `tokenizer.json`.
    pub fn from_directory(model_dir: &Path) -> Result<Self, BrainError> {
        Self::from_files(
            &model_dir.join("model.onnx"),
            &model_dir.join("tokenizer.json"),
        )
    }

    /// Load from explicit model and tokenizer file paths.
    pub fn from_files(model_path: &Path, tokenizer_path: &Path) -> Result<Self, BrainError> {
        if !model_path.exists() {
            return Err(BrainError::Config(format!(
                "ONNX model not found at {}",
                model_path.display()
            )));
        }
        if !tokenizer_path.exists() {
            return Err(BrainError::Config(format!(
                "Tokenizer not found at {}",
                tokenizer_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| BrainError::Internal(format!("ONNX session builder: {}", e)))?
            .with_intra_threads(1)
            .map_err(|e| BrainError::Internal(format!("ONNX set threads: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| BrainError::Internal(format!("ONNX load model: {}", e)))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| BrainError::Config(format!("Failed to load tokenizer: {}", e)))?;

        let mut service = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            dimensions: 0,
        };

        // Exported models usually leave the hidden axis dynamic, so measure it.
        let dimensions = service.embed_sync("test")?.len();
        if dimensions == 0 {
            return Err(BrainError::Internal(
                "ONNX model produced an empty embedding".to_string(),
            ));
        }
        service.dimensions = dimensions;

        info!(
            model = %model_path.display(),
            dimensions,
            "Loaded ONNX embedding model"
        );

        Ok(service)
    }

    /// Tokenize, run inference, and mean-pool the output.
    fn embed_sync(&self, text: &str) -> Result<Vec<f32>, BrainError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| BrainError::Internal(format!("Tokenization failed: {}", e)))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();

        let seq_len = input_ids.len();

        let ids_array = ndarray::Array2::from_shape_vec((1, seq_len), input_ids)
            .map_err(|e| BrainError::Internal(format!("input_ids array: {}", e)))?;
        let mask_array = ndarray::Array2::from_shape_vec((1, seq_len), attention_mask.clone())
            .map_err(|e| BrainError::Internal(format!("attention_mask array: {}", e)))?;
        let type_array = ndarray::Array2::from_shape_vec((1, seq_len), token_type_ids)
            .map_err(|e| BrainError::Internal(format!("token_type_ids array: {}", e)))?;

        let ids_ref = TensorRef::from_array_view(&ids_array)
            .map_err(|e| BrainError::Internal(format!("TensorRef input_ids: {}", e)))?;
        let mask_ref = TensorRef::from_array_view(&mask_array)
            .map_err(|e| BrainError::Internal(format!("TensorRef attention_mask: {}", e)))?;
        let type_ref = TensorRef::from_array_view(&type_array)
            .map_err(|e| BrainError::Internal(format!("TensorRef token_type_ids: {}", e)))?;

        // The session lock is released before pooling.
        let (shape_dims, data) = {
            let mut session = self
                .session
                .lock()
                .map_err(|e| BrainError::Internal(format!("Session lock poisoned: {}", e)))?;
            let outputs = session
                .run(ort::inputs![ids_ref, mask_ref, type_ref])
                .map_err(|e| BrainError::Internal(format!("ONNX inference failed: {}", e)))?;

            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| BrainError::Internal(format!("Extract embeddings: {}", e)))?;
            (shape.iter().copied().collect::<Vec<i64>>(), data.to_vec())
        };

        let hidden_dim = match shape_dims.as_slice() {
            [_, .., last] if *last > 0 => *last as usize,
            _ => {
                return Err(BrainError::Internal(format!(
                    "Unexpected output shape: {:?}",
                    shape_dims
                )))
            }
        };

        mean_pool(&data, &attention_mask, hidden_dim)
    }
}

/// Masked mean pooling over `[seq_len, hidden_dim]` token rows, then L2
/// normalization.
///
/// Fails if `data` does not hold exactly one `hidden_dim` row per mask entry.
fn mean_pool(
    data: &[f32],
    attention_mask: &[i64],
    hidden_dim: usize,
) -> Result<Vec<f32>, BrainError> {
    if hidden_dim == 0 || data.len() != attention_mask.len() * hidden_dim {
        return Err(BrainError::Internal(format!(
            "Token embeddings have {} values, expected {} tokens x {}",
            data.len(),
            attention_mask.len(),
            hidden_dim
        )));
    }

    let mut pooled = vec![0.0f32; hidden_dim];
    let mut count = 0.0f32;

    for (tok_idx, &mask_val) in attention_mask.iter().enumerate() {
        if mask_val > 0 {
            let row = &data[tok_idx * hidden_dim..(tok_idx + 1) * hidden_dim];
            for (acc, v) in pooled.iter_mut().zip(row) {
                *acc += v;
            }
            count += 1.0;
        }
    }

    if count > 0.0 {
        for val in &mut pooled {
            *val /= count;
        }
    }

    l2_normalize(&mut pooled);
    Ok(pooled)
}

fn l2_normalize(values: &mut [f32]) {
    let norm: f32 = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in values.iter_mut() {
            *val /= norm;
        }
    }
}

impl EmbeddingService for OnnxEmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, BrainError> {
        // Inference is CPU-bound; keep it off the async workers.
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let dims = self.dimensions;
        let text_owned = text.to_string();

        tokio::task::spawn_blocking(move || {
            let svc = OnnxEmbeddingService {
                session,
                tokenizer,
                dimensions: dims,
            };
            svc.embed_sync(&text_owned)
        })
        .await
        .map_err(|e| BrainError::Internal(format!("Embedding task panicked: {}", e)))?
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// MockEmbedding
// ---------------------------------------------------------------------------

/// Mock embedding service returning deterministic 384-dimensional unit
/// vectors derived from a hash of the input text.
#[derive(Debug, Clone, Default)]
pub struct MockEmbedding;

impl MockEmbedding {
    pub const DIMENSIONS: usize = 384;

    pub fn new() -> Self {
        Self
    }

    fn hash_to_vector(text: &str) -> Vec<f32> {
        let mut result = Vec::with_capacity(Self::DIMENSIONS);
        for i in 0..Self::DIMENSIONS {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            i.hash(&mut hasher);
            let h = hasher.finish();
            let val = ((h as f64) / (u64::MAX as f64)) * 2.0 - 1.0;
            result.push(val as f32);
        }
        l2_normalize(&mut result);
        result
    }
}

impl EmbeddingService for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, BrainError> {
        Ok(Self::hash_to_vector(text))
    }

    fn dimensions(&self) -> usize {
        Self::DIMENSIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedding_dimension() {
        let service = MockEmbedding::new();
        let vec = service.embed("hello world").await.unwrap();
        assert_eq!(vec.len(), 384);
        assert_eq!(EmbeddingService::dimensions(&service), 384);
    }

    #[tokio::test]
    async fn test_mock_embedding_deterministic() {
        let service = MockEmbedding::new();
        let v1 = service.embed("same text").await.unwrap();
        let v2 = service.embed("same text").await.unwrap();
        assert_eq!(v1, v2);
    }

    #[tokio::test]
    async fn test_mock_embedding_different_inputs() {
        let service = MockEmbedding::new();
        let v1 = service.embed("text one").await.unwrap();
        let v2 = service.embed("text two").await.unwrap();
        assert_ne!(v1, v2);
    }

    #[tokio::test]
    async fn test_mock_embedding_is_unit_length() {
        let service = MockEmbedding::new();
        let vec = service.embed("test range").await.unwrap();
        let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "norm was {}", norm);
    }

    #[tokio::test]
    async fn test_mock_embedding_accepts_empty_text() {
        let service = MockEmbedding::new();
        let vec = service.embed("").await.unwrap();
        assert_eq!(vec.len(), 384);
    }

    #[tokio::test]
    async fn test_dyn_dispatch_matches_static() {
        let service = MockEmbedding::new();
        let boxed: Box<dyn DynEmbeddingService> = Box::new(MockEmbedding::new());
        let a = service.embed("boxed").await.unwrap();
        let b = boxed.embed_boxed("boxed").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(boxed.dimensions(), 384);
    }

    #[test]
    fn test_mean_pool_respects_mask() {
        // Two tokens of width 2; the second is masked out.
        let data = [3.0, 4.0, 100.0, 100.0];
        let pooled = mean_pool(&data, &[1, 0], 2).unwrap();
        assert!((pooled[0] - 0.6).abs() < 1e-6);
        assert!((pooled[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_mean_pool_rejects_short_output() {
        // One row of width 4 cannot cover three tokens.
        let data = [1.0, 2.0, 3.0, 4.0];
        let result = mean_pool(&data, &[1, 1, 1], 4);
        assert!(matches!(result, Err(BrainError::Internal(_))));

        assert!(mean_pool(&[], &[1], 0).is_err());
    }

    #[test]
    fn test_onnx_missing_model() {
        let result = OnnxEmbeddingService::from_directory(Path::new("/nonexistent"));
        assert!(matches!(result, Err(BrainError::Config(_))));
    }
}
