//! Error types for chat routing.

use brain_core::error::BrainError;

/// Errors from the chat router.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("temperature must be within [0, 2], got {0}")]
    InvalidTemperature(f64),
    #[error("max_tokens must be within [1, 4096], got {0}")]
    InvalidMaxTokens(u32),
    #[error("chat templating failed: {0}")]
    Template(String),
}

impl From<ChatError> for BrainError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidTemperature(_) | ChatError::InvalidMaxTokens(_) => {
                BrainError::Validation(format!("chat: {}", err))
            }
            ChatError::Template(_) => BrainError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(
            ChatError::InvalidTemperature(2.5).to_string(),
            "temperature must be within [0, 2], got 2.5"
        );
        assert_eq!(
            ChatError::InvalidMaxTokens(0).to_string(),
            "max_tokens must be within [1, 4096], got 0"
        );
        assert_eq!(
            ChatError::Template("formatter error".to_string()).to_string(),
            "chat templating failed: formatter error"
        );
    }

    #[test]
    fn test_range_errors_become_validation() {
        let err: BrainError = ChatError::InvalidMaxTokens(5000).into();
        assert!(matches!(err, BrainError::Validation(_)));
        assert!(err.to_string().contains("5000"));

        let err: BrainError = ChatError::InvalidTemperature(-0.1).into();
        assert!(matches!(err, BrainError::Validation(_)));
    }

    #[test]
    fn test_template_error_becomes_internal() {
        let err: BrainError = ChatError::Template("boom".to_string()).into();
        assert!(matches!(err, BrainError::Internal(_)));
        assert_eq!(err.to_string(), "Internal error: chat templating failed: boom");
    }
}
