//! Cosine similarity.

use brain_core::error::{BrainError, Result};

/// Cosine similarity between two vectors: `dot(a, b) / (|a| * |b|)`.
///
/// Accumulates in f64. Returns a value in `[-1.0, 1.0]`; rounding on
/// near-parallel vectors is clamped back into range.
///
/// # Errors
///
/// - [`BrainError::Validation`] if the vectors differ in length.
/// - [`BrainError::Numeric`] if either vector has zero norm or the result is
///   not finite. The undefined case is never reported as `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(BrainError::Validation(format!(
            "cosine similarity: dimension mismatch ({} vs {})",
            a.len(),
            b.len()
        )));
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return Err(BrainError::Numeric(
            "cosine similarity: zero-norm vector".to_string(),
        ));
    }

    let similarity = dot / denom;
    if !similarity.is_finite() {
        return Err(BrainError::Numeric(format!(
            "cosine similarity: non-finite result ({})",
            similarity
        )));
    }

    Ok(similarity.clamp(-1.0, 1.0))
}
