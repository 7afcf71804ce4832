//! Data types shared between the vector, insight, chat and API crates.

use serde::{Deserialize, Serialize};

/// A dense embedding. Every vector in one batch has the model's dimension.
pub type Vector = Vec<f32>;

/// Output of a batch embedding call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embeddings {
    /// One vector per input text, in input order.
    pub vectors: Vec<Vector>,
    /// Dimension shared by every vector in `vectors`.
    pub dimension: usize,
}

/// A candidate text and its caller-supplied vector.
///
/// `index` is the candidate's position in the caller's input and is carried
/// through ranking unchanged.
#[derive(Debug, Clone, Copy)]
pub struct SearchCandidate<'a> {
    pub text: &'a str,
    pub vector: &'a [f32],
    pub index: usize,
}

/// A ranked match returned by semantic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub text: String,
    /// Cosine similarity to the query, in `[-1, 1]`.
    pub similarity: f64,
    /// Original position of the candidate in the caller's input.
    pub index: usize,
}

/// Ranked results plus the query vector they were scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub query_vector: Vector,
}

/// Embedding model availability, as reported by health checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHealth {
    pub model_loaded: bool,
    pub embedding_dimension: Option<usize>,
}
