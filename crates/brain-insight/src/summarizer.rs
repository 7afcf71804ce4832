//! Extractive summarization of a single text.

use crate::types::Summary;

/// Texts with at most this many sentences are returned unchanged.
const SHORT_TEXT_SENTENCES: usize = 3;

/// Words of summary budget per selected sentence.
const WORDS_PER_SENTENCE: i64 = 20;

/// Picks the first, middle and last sentences of a text.
///
/// Sentences are the trimmed, non-empty pieces between `.` characters. This
/// is a plain delimiter split: abbreviations and decimals break sentences
/// too.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSummarizer;

impl TextSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// Summarize `text` in at most three sentences.
    ///
    /// `max_length / 20` (integer division, clamped to `1..=3`) decides how
    /// many sentences are kept: first; first and last; or first, middle
    /// (`len / 2`) and last.
    pub fn summarize(&self, text: &str, max_length: i64) -> Summary {
        let sentences = split_sentences(text);

        let summary = if sentences.len() <= SHORT_TEXT_SENTENCES {
            text.to_string()
        } else {
            let first = sentences[0];
            let last = sentences[sentences.len() - 1];
            match sentence_budget(max_length) {
                1 => format!("{}.", first),
                2 => format!("{}. {}.", first, last),
                _ => format!("{}. {}. {}.", first, sentences[sentences.len() / 2], last),
            }
        };

        Summary {
            original_word_count: word_count(text),
            summary_word_count: word_count(&summary),
            summary,
        }
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn sentence_budget(max_length: i64) -> i64 {
    (max_length / WORDS_PER_SENTENCE).clamp(1, 3)
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
