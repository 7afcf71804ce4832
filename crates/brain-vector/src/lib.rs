//! Brain Vector crate - embedding engine, cosine similarity and semantic search.
//!
//! Provides the one-time-loaded embedding engine (ONNX or mock backend),
//! a cosine similarity that refuses degenerate vectors, and a search engine
//! that ranks caller-supplied candidates against an embedded query.

pub mod embedding;
pub mod engine;
pub mod search;
pub mod similarity;

pub use embedding::{DynEmbeddingService, EmbeddingService, MockEmbedding, OnnxEmbeddingService};
pub use engine::{EmbeddingEngine, ModelState};
pub use search::{rank, SearchEngine};
pub use similarity::cosine_similarity;
