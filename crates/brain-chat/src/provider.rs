//! Chat providers and the startup credential table.

use std::fmt;

use serde::Serialize;

/// A chat provider named by a request's model selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provider {
    Claude,
    Gpt,
    Gemini,
    /// Any selector that names no known provider. Holds the selector verbatim.
    Unknown(String),
}

impl Provider {
    /// The three providers a credential can be configured for.
    pub const KNOWN: [Provider; 3] = [Provider::Claude, Provider::Gpt, Provider::Gemini];

    /// Parse a selector. Matching is exact and case-sensitive.
    pub fn parse(selector: &str) -> Self {
        match selector {
            "claude" => Self::Claude,
            "gpt" => Self::Gpt,
            "gemini" => Self::Gemini,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn selector(&self) -> &str {
        match self {
            Self::Claude => "claude",
            Self::Gpt => "gpt",
            Self::Gemini => "gemini",
            Self::Unknown(selector) => selector,
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn credential_var(&self) -> Option<&'static str> {
        match self {
            Self::Claude => Some("ANTHROPIC_API_KEY"),
            Self::Gpt => Some("OPENAI_API_KEY"),
            Self::Gemini => Some("GOOGLE_API_KEY"),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// Whether a provider's credential was present at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderEntry {
    pub provider: String,
    pub credential_present: bool,
}

/// Credential presence per provider, fixed at startup.
///
/// Only presence is recorded; key values are never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    claude: bool,
    gpt: bool,
    gemini: bool,
}

impl ProviderCredentials {
    pub fn new(claude: bool, gpt: bool, gemini: bool) -> Self {
        Self {
            claude,
            gpt,
            gemini,
        }
    }

    /// Record which credential variables resolve to a non-empty value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |provider: &Provider| {
            provider
                .credential_var()
                .and_then(|var| lookup(var))
                .is_some_and(|value| !value.is_empty())
        };
        Self {
            claude: present(&Provider::Claude),
            gpt: present(&Provider::Gpt),
            gemini: present(&Provider::Gemini),
        }
    }

    /// Read credential presence from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn is_configured(&self, provider: &Provider) -> bool {
        match provider {
            Provider::Claude => self.claude,
            Provider::Gpt => self.gpt,
            Provider::Gemini => self.gemini,
            Provider::Unknown(_) => false,
        }
    }

    pub fn entries(&self) -> Vec<ProviderEntry> {
        Provider::KNOWN
            .iter()
            .map(|provider| ProviderEntry {
                provider: provider.selector().to_string(),
                credential_present: self.is_configured(provider),
            })
            .collect()
    }
}
