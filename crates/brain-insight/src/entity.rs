//! Heuristic entity, keyword and topic extraction.

use std::collections::HashSet;

use crate::types::{Entity, EntityType, Extraction};

const MAX_ENTITIES: usize = 20;
const MAX_KEYWORDS: usize = 10;
const MAX_TOPICS: usize = 5;

/// Confidence attached to every capitalized-token entity.
const ENTITY_CONFIDENCE: f64 = 0.6;

/// Punctuation stripped from both ends of a token.
const EDGE_PUNCTUATION: &[char] = &['.', ',', '!', '?'];

const STOP_WORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "been", "were", "would", "could", "their", "there",
];

/// Pulls capitalized tokens as entities and long tokens as keywords.
///
/// Works token by token over a whitespace split. Length and stop-word tests
/// look at the raw token; punctuation is only stripped from the stored value.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract entities, keywords and topics from `text`.
    ///
    /// - Entities: tokens starting with an uppercase letter and longer than
    ///   two characters, first 20 in text order, confidence 0.6.
    /// - Keywords: lowercased tokens longer than five characters that are not
    ///   stop words, deduplicated in first-occurrence order, first 10.
    /// - Topics: the first five keywords.
    pub fn extract(&self, text: &str) -> Extraction {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        let entities: Vec<Entity> = tokens
            .iter()
            .filter(|token| is_entity_candidate(token))
            .take(MAX_ENTITIES)
            .map(|token| Entity {
                text: strip_edges(token).to_string(),
                entity_type: EntityType::Entity,
                confidence: ENTITY_CONFIDENCE,
            })
            .collect();

        let mut seen = HashSet::new();
        let keywords: Vec<String> = tokens
            .iter()
            .filter(|token| is_keyword_candidate(token))
            .map(|token| strip_edges(&token.to_lowercase()).to_string())
            .filter(|keyword| seen.insert(keyword.clone()))
            .take(MAX_KEYWORDS)
            .collect();

        let topics = keywords.iter().take(MAX_TOPICS).cloned().collect();

        Extraction {
            entities,
            topics,
            keywords,
        }
    }
}

fn is_entity_candidate(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase) && token.chars().count() > 2
}

fn is_keyword_candidate(token: &str) -> bool {
    token.chars().count() > 5 && !STOP_WORDS.contains(&token.to_lowercase().as_str())
}

fn strip_edges(token: &str) -> &str {
    token.trim_matches(EDGE_PUNCTUATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Extraction {
        EntityExtractor::new().extract(text)
    }

    fn entity_texts(extraction: &Extraction) -> Vec<&str> {
        extraction.entities.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_capitalized_sentence() {
        let result = extract("Paris is a Wonderful City with Amazing Architecture");

        assert_eq!(
            entity_texts(&result),
            vec!["Paris", "Wonderful", "City", "Amazing", "Architecture"]
        );
        assert!(result
            .entities
            .iter()
            .all(|e| e.entity_type == EntityType::Entity && (e.confidence - 0.6).abs() < 1e-12));

        assert_eq!(result.keywords, vec!["wonderful", "amazing", "architecture"]);
        assert_eq!(result.topics, result.keywords);
    }

    #[test]
    fn test_entity_punctuation_stripped() {
        let result = extract("We met Alice, then Bob! Then London.");
        assert_eq!(entity_texts(&result), vec!["Alice", "Bob", "Then", "London"]);
    }

    #[test]
    fn test_short_capitalized_tokens_ignored() {
        // "Hi" and "Al" are too short; "Hi." is three characters before stripping.
        let result = extract("Hi Al Hi.");
        assert_eq!(entity_texts(&result), vec!["Hi"]);
    }

    #[test]
    fn test_entities_capped_at_twenty() {
        let text: Vec<String> = (0..30).map(|i| format!("Name{}", i)).collect();
        let result = extract(&text.join(" "));
        assert_eq!(result.entities.len(), 20);
        assert_eq!(result.entities[0].text, "Name0");
        assert_eq!(result.entities[19].text, "Name19");
    }

    #[test]
    fn test_keywords_deduplicated_in_first_occurrence_order() {
        let result = extract("Rust compiler, rust compiler. Borrow checker! COMPILER lifetimes");
        assert_eq!(result.keywords, vec!["compiler", "borrow", "checker", "lifetimes"]);
    }

    #[test]
    fn test_keyword_length_uses_raw_token() {
        // "hello," is six characters with its comma, so it qualifies.
        let result = extract("hello, world");
        assert_eq!(result.keywords, vec!["hello"]);
    }

    #[test]
    fn test_keywords_capped_and_topics_prefix() {
        let words: Vec<String> = (0..15).map(|i| format!("keyword{:02}", i)).collect();
        let result = extract(&words.join(" "));
        assert_eq!(result.keywords.len(), 10);
        assert_eq!(result.keywords[0], "keyword00");
        assert_eq!(result.keywords[9], "keyword09");
        assert_eq!(result.topics, result.keywords[..5].to_vec());
    }

    #[test]
    fn test_stop_words_never_become_keywords() {
        // Every stop word is five characters or shorter, so the length rule
        // already drops them. The list is kept to match the reference
        // keyword heuristic and cannot be observed through this rule alone.
        let result = extract("that this with from have been were would could their there");
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extract(""), Extraction::default());
        assert_eq!(extract("   \n\t "), Extraction::default());
    }
}
