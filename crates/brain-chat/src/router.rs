//! Chat routing: pick a provider, or degrade to a templated mock reply.
//!
//! Provider calls are not wired up yet. A provider whose credential is
//! missing answers with its own mock template; a configured provider yields
//! [`RouteOutcome::NotImplemented`] carrying the generic mock reply; an
//! unknown selector gets the generic mock reply directly.

use std::fmt::Write;

use tracing::debug;

use crate::error::ChatError;
use crate::provider::{Provider, ProviderCredentials};
use crate::types::{ChatExchange, ChatReply};

/// Result of routing one exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// A templated placeholder reply.
    Mock(ChatReply),
    /// The provider is configured but its client does not exist yet.
    /// `fallback` is the generic mock reply to serve in its place.
    NotImplemented {
        provider: Provider,
        fallback: ChatReply,
    },
}

impl RouteOutcome {
    /// The reply to hand back to the caller.
    pub fn into_reply(self) -> ChatReply {
        match self {
            Self::Mock(reply) => reply,
            Self::NotImplemented { fallback, .. } => fallback,
        }
    }
}

/// Routes chat exchanges using the credential table read at startup.
#[derive(Debug, Clone)]
pub struct ChatRouter {
    credentials: ProviderCredentials,
}

impl ChatRouter {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &ProviderCredentials {
        &self.credentials
    }

    /// Route one exchange.
    ///
    /// Fails only on out-of-range `temperature` / `max_tokens` or if a reply
    /// template cannot be rendered.
    pub fn route(&self, exchange: &ChatExchange) -> Result<RouteOutcome, ChatError> {
        validate(exchange)?;

        let provider = Provider::parse(&exchange.model_selector);
        let outcome = match &provider {
            Provider::Claude | Provider::Gpt | Provider::Gemini
                if !self.credentials.is_configured(&provider) =>
            {
                RouteOutcome::Mock(mock_reply(&provider, exchange, provider_template)?)
            }
            Provider::Claude | Provider::Gpt | Provider::Gemini => {
                debug!(provider = %provider, "Provider client not implemented");
                RouteOutcome::NotImplemented {
                    fallback: mock_reply(&provider, exchange, default_template)?,
                    provider: provider.clone(),
                }
            }
            Provider::Unknown(_) => {
                RouteOutcome::Mock(mock_reply(&provider, exchange, default_template)?)
            }
        };

        debug!(selector = %exchange.model_selector, "Chat exchange routed");
        Ok(outcome)
    }
}

fn validate(exchange: &ChatExchange) -> Result<(), ChatError> {
    if !(0.0..=2.0).contains(&exchange.temperature) {
        return Err(ChatError::InvalidTemperature(exchange.temperature));
    }
    if !(1..=4096).contains(&exchange.max_tokens) {
        return Err(ChatError::InvalidMaxTokens(exchange.max_tokens));
    }
    Ok(())
}

type Template = fn(&Provider, &str, &mut String) -> std::fmt::Result;

fn mock_reply(
    provider: &Provider,
    exchange: &ChatExchange,
    template: Template,
) -> Result<ChatReply, ChatError> {
    let mut response = String::new();
    template(provider, &exchange.message, &mut response)
        .map_err(|e| ChatError::Template(format!("{} reply: {}", provider, e)))?;

    Ok(ChatReply {
        response,
        resolved_model: format!("{}-mock", provider.selector()),
        tokens_used: None,
        context_echoed: exchange.context.clone(),
    })
}

/// Provider-specific reply naming the missing credential.
fn provider_template(provider: &Provider, message: &str, out: &mut String) -> std::fmt::Result {
    match provider {
        Provider::Claude => write!(
            out,
            "[Mock Claude Response] I understand you said: '{}'. This is a demo response as ANTHROPIC_API_KEY is not configured.",
            message
        ),
        Provider::Gpt => write!(
            out,
            "[Mock GPT Response] I heard you: '{}'. Configure OPENAI_API_KEY for real responses.",
            message
        ),
        Provider::Gemini => write!(
            out,
            "[Mock Gemini Response] Your message: '{}'. Set GOOGLE_API_KEY for actual responses.",
            message
        ),
        Provider::Unknown(_) => default_template(provider, message, out),
    }
}

fn default_template(_provider: &Provider, message: &str, out: &mut String) -> std::fmt::Result {
    write!(
        out,
        "Received your message: '{}'. AI integration in progress.",
        message
    )
}
