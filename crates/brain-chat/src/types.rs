use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One prior message of a conversation, as the client sent it
/// (typically `{"role": ..., "content": ...}`).
pub type HistoryMessage = BTreeMap<String, String>;

/// A chat message to route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub message: String,
    /// Provider selector: "claude", "gpt", "gemini", or anything else.
    pub model_selector: String,
    /// Contextual memories supplied by the caller.
    pub context: Option<Vec<String>>,
    pub history: Option<Vec<HistoryMessage>>,
    /// Sampling temperature, `[0, 2]`.
    pub temperature: f64,
    /// Response budget, `[1, 4096]`.
    pub max_tokens: u32,
}

impl ChatExchange {
    /// An exchange with the service defaults: temperature 0.7, 1024 tokens,
    /// no context or history.
    pub fn new(message: impl Into<String>, model_selector: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            model_selector: model_selector.into(),
            context: None,
            history: None,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = Some(context);
        self
    }
}

/// Reply to a routed chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// Model tag; placeholder replies end in `-mock`.
    pub resolved_model: String,
    pub tokens_used: Option<u32>,
    pub context_echoed: Option<Vec<String>>,
}
