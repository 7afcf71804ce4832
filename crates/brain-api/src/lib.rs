//! Brain API crate - axum HTTP server and route handlers.
//!
//! Exposes embedding, semantic search, summarization, extraction, chat and
//! health endpoints over JSON.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
