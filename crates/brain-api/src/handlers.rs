//! Route handler functions for all API endpoints.
//!
//! Each handler deserializes its JSON body, fills omitted parameters from
//! the configured defaults, calls the matching service in AppState and
//! returns a JSON response.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use brain_chat::{ChatExchange, HistoryMessage, RouteOutcome};
use brain_core::types::{SearchResult, Vector};
use brain_insight::Entity;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub texts: Vec<String>,
    /// Echoed back; the loaded model is used regardless.
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Candidate vectors, paired by position with `texts`.
    pub embeddings: Vec<Vector>,
    pub texts: Vec<String>,
    pub limit: Option<i64>,
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    pub max_length: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub model: Option<String>,
    pub context: Option<Vec<String>>,
    pub conversation_history: Option<Vec<HistoryMessage>>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Query parameters of `/suggest`; the embedding is the JSON body.
#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub memory_id: String,
    pub limit: Option<i64>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when the embedding model is loaded, "degraded" otherwise.
    pub status: String,
    pub timestamp: String,
    pub model_loaded: bool,
    pub embedding_dimension: Option<usize>,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vector>,
    pub dimension: usize,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub query_embedding: Vector,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub original_length: usize,
    pub summary_length: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub entities: Vec<Entity>,
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub model: String,
    pub tokens_used: Option<u32>,
    pub context_used: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub memory_id: String,
    pub suggested: Vec<String>,
    pub message: String,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET / and GET /health - model availability and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.engine.health();
    let status = if model.model_loaded {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        model_loaded: model.model_loaded,
        embedding_dimension: model.embedding_dimension,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /embed - embed a batch of texts.
pub async fn embed(
    State(state): State<AppState>,
    Json(req): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let embeddings = state.engine.embed(&req.texts).await?;
    debug!(count = req.texts.len(), dimension = embeddings.dimension, "Embedded texts");

    Ok(Json(EmbedResponse {
        embeddings: embeddings.vectors,
        dimension: embeddings.dimension,
        model: req
            .model
            .unwrap_or_else(|| state.engine.model_id().to_string()),
    }))
}

/// POST /search - rank caller-supplied candidates against a query.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let limit = req.limit.unwrap_or(state.config.search.default_limit);
    let threshold = req
        .threshold
        .unwrap_or(state.config.search.default_threshold);

    let outcome = state
        .search
        .semantic_search(&req.query, &req.texts, &req.embeddings, threshold, limit)
        .await?;

    Ok(Json(SearchResponse {
        results: outcome.results,
        query_embedding: outcome.query_vector,
    }))
}

/// POST /summarize - extractive summary.
pub async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Json<SummarizeResponse> {
    let max_length = req
        .max_length
        .unwrap_or(state.config.summarize.default_max_length);
    let summary = state.summarizer.summarize(&req.text, max_length);

    Json(SummarizeResponse {
        summary: summary.summary,
        original_length: summary.original_word_count,
        summary_length: summary.summary_word_count,
    })
}

/// POST /extract - entities, topics and keywords.
pub async fn extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Json<ExtractResponse> {
    let extraction = state.extractor.extract(&req.text);
    Json(ExtractResponse {
        entities: extraction.entities,
        topics: extraction.topics,
        keywords: extraction.keywords,
    })
}

/// POST /chat - route a message to a provider or its mock reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let defaults = &state.config.chat;
    let exchange = ChatExchange {
        message: req.message,
        model_selector: req.model.unwrap_or_else(|| defaults.default_model.clone()),
        context: req.context,
        history: req.conversation_history,
        temperature: req.temperature.unwrap_or(defaults.default_temperature),
        max_tokens: req.max_tokens.unwrap_or(defaults.default_max_tokens),
    };

    let reply = match state.chat.route(&exchange)? {
        RouteOutcome::Mock(reply) => reply,
        RouteOutcome::NotImplemented { provider, fallback } => {
            warn!(
                provider = %provider,
                "Provider client not available; returning fallback reply"
            );
            fallback
        }
    };

    Ok(Json(ChatResponse {
        response: reply.response,
        model: reply.resolved_model,
        tokens_used: reply.tokens_used,
        context_used: reply.context_echoed,
    }))
}

/// POST /suggest - related-memory suggestions.
///
/// `memory_id` and `limit` come from the query string and the body is the
/// embedding as a bare JSON array. Suggestions need a memory store this
/// service does not have; the endpoint always answers with an empty list.
pub async fn suggest(
    Query(params): Query<SuggestParams>,
    Json(embedding): Json<Vector>,
) -> Json<SuggestResponse> {
    debug!(
        memory_id = %params.memory_id,
        dimension = embedding.len(),
        limit = params.limit.unwrap_or(5),
        "Suggestion requested"
    );

    Json(SuggestResponse {
        memory_id: params.memory_id,
        suggested: Vec::new(),
        message: "Memory suggestions require database integration".to_string(),
    })
}
