//! Semantic search over caller-supplied candidates.
//!
//! SearchEngine embeds the query with the shared [`EmbeddingEngine`] and
//! ranks candidate vectors by cosine similarity. Nothing is indexed or kept
//! between calls; candidates arrive with each request.

use std::cmp::Ordering;
use std::sync::Arc;

use brain_core::error::{BrainError, Result};
use brain_core::types::{SearchCandidate, SearchOutcome, SearchResult, Vector};
use tracing::debug;

use crate::engine::EmbeddingEngine;
use crate::similarity::cosine_similarity;

/// Ranks candidates against an embedded query.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    engine: Arc<EmbeddingEngine>,
}

impl SearchEngine {
    pub fn new(engine: Arc<EmbeddingEngine>) -> Self {
        Self { engine }
    }

    /// Embed `query` and rank the candidates against it.
    ///
    /// `candidate_texts[i]` pairs with `candidate_vectors[i]`; the lengths
    /// must match or the call fails with [`BrainError::Validation`] before
    /// anything is embedded. The query vector is returned alongside the
    /// results even when no candidate qualifies.
    pub async fn semantic_search(
        &self,
        query: &str,
        candidate_texts: &[String],
        candidate_vectors: &[Vector],
        threshold: f64,
        limit: i64,
    ) -> Result<SearchOutcome> {
        if candidate_texts.len() != candidate_vectors.len() {
            return Err(BrainError::Validation(format!(
                "semantic search: {} candidate texts but {} candidate vectors",
                candidate_texts.len(),
                candidate_vectors.len()
            )));
        }

        let query_vector = self.engine.embed_one(query).await?;

        let candidates = candidate_texts
            .iter()
            .zip(candidate_vectors)
            .enumerate()
            .map(|(index, (text, vector))| SearchCandidate {
                text,
                vector,
                index,
            });
        let results = rank(&query_vector, candidates, threshold, limit)?;

        debug!(
            candidates = candidate_texts.len(),
            matched = results.len(),
            threshold,
            limit,
            "Semantic search complete"
        );

        Ok(SearchOutcome {
            results,
            query_vector,
        })
    }
}

/// Score, filter, sort and truncate candidates.
///
/// Keeps candidates with similarity `>= threshold`, orders them by
/// similarity descending and returns at most `limit` (none when
/// `limit <= 0`). The sort is stable, so equal similarities stay in
/// ascending original-index order.
pub fn rank<'a>(
    query_vector: &[f32],
    candidates: impl IntoIterator<Item = SearchCandidate<'a>>,
    threshold: f64,
    limit: i64,
) -> Result<Vec<SearchResult>> {
    if limit <= 0 {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    for candidate in candidates {
        let similarity = cosine_similarity(query_vector, candidate.vector).map_err(|e| match e {
            BrainError::Numeric(msg) => {
                BrainError::Numeric(format!("candidate {}: {}", candidate.index, msg))
            }
            BrainError::Validation(msg) => {
                BrainError::Validation(format!("candidate {}: {}", candidate.index, msg))
            }
            other => other,
        })?;

        if similarity >= threshold {
            results.push(SearchResult {
                text: candidate.text.to_string(),
                similarity,
                index: candidate.index,
            });
        }
    }

    results.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    Ok(results)
}
