use thiserror::Error;

/// Top-level error type for the brain service.
///
/// The first four variants are the kinds every text-intelligence operation
/// can fail with. The rest cover configuration and process plumbing.
/// Subsystem crates implement `From<SubsystemError> for BrainError` so that
/// `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BrainError {
    /// The embedding model is not loaded (never loaded, or the load failed).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The caller broke an input contract (mismatched lengths, out-of-range
    /// parameters, empty batches).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A degenerate vector made a similarity computation undefined.
    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for BrainError {
    fn from(err: toml::de::Error) -> Self {
        BrainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BrainError {
    fn from(err: toml::ser::Error) -> Self {
        BrainError::Config(err.to_string())
    }
}

/// A specialized `Result` type for brain operations.
pub type Result<T> = std::result::Result<T, BrainError>;
