pub mod config;
pub mod error;
pub mod types;

pub use config::{BrainConfig, ConfigOrigin, RejectedOverride};
pub use error::{BrainError, Result};
pub use types::*;
