//! Brain Insight crate - extractive summarization and heuristic extraction.
//!
//! Both services are pure and stateless:
//! - `TextSummarizer` keeps the first, middle and last sentences of a text
//! - `EntityExtractor` pulls capitalized tokens, keywords and topics

pub mod entity;
pub mod summarizer;
pub mod types;

pub use entity::EntityExtractor;
pub use summarizer::TextSummarizer;
pub use types::{Entity, EntityType, Extraction, Summary};
