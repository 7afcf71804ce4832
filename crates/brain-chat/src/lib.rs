//! Chat routing for the Brain service.
//!
//! Maps a model selector to a provider and produces a reply. Missing
//! credentials degrade to templated mock replies.

pub mod error;
pub mod provider;
pub mod router;
pub mod types;

pub use error::ChatError;
pub use provider::{Provider, ProviderCredentials, ProviderEntry};
pub use router::{ChatRouter, RouteOutcome};
pub use types::{ChatExchange, ChatReply, HistoryMessage};
