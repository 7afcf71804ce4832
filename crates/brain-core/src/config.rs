use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BrainError, Result};

/// Top-level configuration for the brain service.
///
/// Loaded from `~/.brain/config.toml` by default. Environment variables
/// override file values (see [`BrainConfig::apply_env_overrides`]), and CLI
/// flags override both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrainConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub summarize: SummarizeConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl BrainConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BrainConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    ///
    /// Nothing is logged here; the returned [`ConfigOrigin`] says which case
    /// applied so the caller can report it once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, ConfigOrigin) {
        match Self::load(path) {
            Ok(config) => (config, ConfigOrigin::File),
            Err(BrainError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                (Self::default(), ConfigOrigin::Missing)
            }
            Err(e) => (Self::default(), ConfigOrigin::Rejected(e.to_string())),
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Recognized keys: `EMBEDDING_MODEL`, `BRAIN_MODEL_DIR`,
    /// `BRAIN_EMBEDDING_BACKEND`, `BRAIN_SERVICE_PORT`. Empty values are
    /// skipped. Values that do not parse are left out and returned so the
    /// caller can report them.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Vec<RejectedOverride>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut rejected = Vec::new();

        if let Some(model) = non_empty("EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(dir) = non_empty("BRAIN_MODEL_DIR") {
            self.embedding.model_dir = dir;
        }
        if let Some(backend) = non_empty("BRAIN_EMBEDDING_BACKEND") {
            self.embedding.backend = backend;
        }
        if let Some(port) = non_empty("BRAIN_SERVICE_PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.general.port = p,
                Err(e) => rejected.push(RejectedOverride {
                    key: "BRAIN_SERVICE_PORT",
                    value: port,
                    reason: e.to_string(),
                }),
            }
        }
        rejected
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.embedding.backend.as_str(), "onnx" | "mock") {
            return Err(BrainError::Config(format!(
                "embedding.backend must be 'onnx' or 'mock', got '{}'",
                self.embedding.backend
            )));
        }
        if !(0.0..=2.0).contains(&self.chat.default_temperature) {
            return Err(BrainError::Config(format!(
                "chat.default_temperature must be within [0, 2], got {}",
                self.chat.default_temperature
            )));
        }
        if !(1..=4096).contains(&self.chat.default_max_tokens) {
            return Err(BrainError::Config(format!(
                "chat.default_max_tokens must be within [1, 4096], got {}",
                self.chat.default_max_tokens
            )));
        }
        Ok(())
    }
}

/// Where [`BrainConfig::load_or_default`] took its values from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// The file was read and parsed.
    File,
    /// No file at the path; defaults apply.
    Missing,
    /// The file exists but could not be read or parsed; defaults apply.
    Rejected(String),
}

/// An environment override whose value could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Interface the HTTP server binds to.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            log_level: "info".to_string(),
        }
    }
}

/// Embedding model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model identifier reported back to callers.
    pub model: String,
    /// Directory holding `model.onnx` and `tokenizer.json`. A leading `~/`
    /// is expanded against `$HOME`.
    pub model_dir: String,
    /// Backend: "onnx" for real inference, "mock" for deterministic vectors.
    pub backend: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "BAAI/bge-small-en-v1.5".to_string(),
            model_dir: "~/.brain/models/bge-small-en-v1.5".to_string(),
            backend: "onnx".to_string(),
        }
    }
}

impl EmbeddingConfig {
    /// The model directory with `~/` expanded.
    pub fn resolved_model_dir(&self) -> PathBuf {
        expand_home(&self.model_dir)
    }
}

/// Defaults for semantic search requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results returned when the caller gives no limit.
    pub default_limit: i64,
    /// Minimum cosine similarity when the caller gives no threshold.
    pub default_threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            default_threshold: 0.3,
        }
    }
}

/// Defaults for summarization requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    /// Maximum summary length in words when the caller gives none.
    pub default_max_length: i64,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            default_max_length: 150,
        }
    }
}

/// Defaults for chat requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Provider selector used when the caller names none.
    pub default_model: String,
    pub default_temperature: f64,
    pub default_max_tokens: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: "claude".to_string(),
            default_temperature: 0.7,
            default_max_tokens: 1024,
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BrainConfig::default();
        assert_eq!(config.general.host, "0.0.0.0");
        assert_eq!(config.general.port, 8001);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.embedding.model, "BAAI/bge-small-en-v1.5");
        assert_eq!(config.embedding.backend, "onnx");
        assert_eq!(config.search.default_limit, 10);
        assert!((config.search.default_threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.summarize.default_max_length, 150);
        assert_eq!(config.chat.default_model, "claude");
        assert_eq!(config.chat.default_max_tokens, 1024);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
port = 9100
log_level = "debug"

[embedding]
model = "all-MiniLM-L6-v2"
model_dir = "/opt/models/minilm"
backend = "mock"

[search]
default_limit = 25
"#;
        let file = create_temp_config(content);
        let config = BrainConfig::load(file.path()).unwrap();
        assert_eq!(config.general.port, 9100);
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.embedding.model, "all-MiniLM-L6-v2");
        assert_eq!(config.embedding.backend, "mock");
        assert_eq!(config.search.default_limit, 25);
        // Unset fields keep their defaults.
        assert_eq!(config.general.host, "0.0.0.0");
        assert!((config.search.default_threshold - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = BrainConfig::load(file.path());
        assert!(matches!(result, Err(BrainError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let (config, origin) = BrainConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.port, 8001);
        assert_eq!(origin, ConfigOrigin::Missing);
    }

    #[test]
    fn test_load_or_default_reports_rejected_file() {
        let file = create_temp_config("this is {{ not toml");
        let (config, origin) = BrainConfig::load_or_default(file.path());
        assert_eq!(config.general.port, 8001);
        match origin {
            ConfigOrigin::Rejected(reason) => assert!(reason.starts_with("Configuration error")),
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_load_or_default_parsed_file() {
        let file = create_temp_config("[general]\nport = 9200\n");
        let (config, origin) = BrainConfig::load_or_default(file.path());
        assert_eq!(config.general.port, 9200);
        assert_eq!(origin, ConfigOrigin::File);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = BrainConfig::default();
        config.chat.default_model = "gemini".to_string();
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = BrainConfig::load(&path).unwrap();
        assert_eq!(reloaded.chat.default_model, "gemini");
        assert_eq!(reloaded.embedding.model, config.embedding.model);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BrainConfig::default();
        let rejected = config.apply_env_overrides(env_of(&[
            ("EMBEDDING_MODEL", "intfloat/e5-small"),
            ("BRAIN_MODEL_DIR", "/models/e5"),
            ("BRAIN_EMBEDDING_BACKEND", "mock"),
            ("BRAIN_SERVICE_PORT", "9001"),
        ]));
        assert_eq!(config.embedding.model, "intfloat/e5-small");
        assert_eq!(config.embedding.model_dir, "/models/e5");
        assert_eq!(config.embedding.backend, "mock");
        assert_eq!(config.general.port, 9001);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_env_overrides_ignore_empty_and_bad_values() {
        let mut config = BrainConfig::default();
        let rejected = config.apply_env_overrides(env_of(&[
            ("EMBEDDING_MODEL", "   "),
            ("BRAIN_SERVICE_PORT", "not-a-port"),
        ]));
        assert_eq!(config.embedding.model, "BAAI/bge-small-en-v1.5");
        assert_eq!(config.general.port, 8001);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].key, "BRAIN_SERVICE_PORT");
        assert_eq!(rejected[0].value, "not-a-port");
    }

    #[test]
    fn test_validate() {
        assert!(BrainConfig::default().validate().is_ok());

        let mut bad_backend = BrainConfig::default();
        bad_backend.embedding.backend = "gpu".to_string();
        assert!(matches!(bad_backend.validate(), Err(BrainError::Config(_))));

        let mut bad_temp = BrainConfig::default();
        bad_temp.chat.default_temperature = 2.5;
        assert!(bad_temp.validate().is_err());

        let mut bad_tokens = BrainConfig::default();
        bad_tokens.chat.default_max_tokens = 0;
        assert!(bad_tokens.validate().is_err());
    }

    #[test]
    fn test_resolved_model_dir_absolute_path_unchanged() {
        let config = EmbeddingConfig {
            model_dir: "/opt/models/bge".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolved_model_dir(), PathBuf::from("/opt/models/bge"));
    }
}
