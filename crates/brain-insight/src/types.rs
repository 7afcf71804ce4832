use serde::{Deserialize, Serialize};

/// Extractive summary of a single text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub summary: String,
    /// Whitespace-separated token count of the input.
    pub original_word_count: usize,
    /// Whitespace-separated token count of `summary`.
    pub summary_word_count: usize,
}

/// Entity categories produced by the extractor.
///
/// The heuristic extractor only knows one category; it is kept as an enum so
/// the wire value is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "ENTITY")]
    Entity,
}

/// Extracted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub confidence: f64,
}

/// Everything the extractor pulls out of one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub entities: Vec<Entity>,
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
}
