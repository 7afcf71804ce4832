//! CLI argument definitions for the brain service.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use brain_core::config::BrainConfig;

/// Brain - embedding, semantic search and text insight service.
#[derive(Parser, Debug)]
#[command(name = "brain", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// HTTP server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG still wins.
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Directory containing model.onnx and tokenizer.json.
    #[arg(short = 'm', long = "model-dir")]
    pub model_dir: Option<PathBuf>,

    /// Embedding backend: onnx or mock.
    #[arg(short = 'b', long = "backend")]
    pub backend: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > BRAIN_CONFIG env var > ~/.brain/config.toml.
    /// Environment values are read through `lookup`.
    pub fn resolve_config_path<F>(&self, lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = lookup("BRAIN_CONFIG").filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        default_config_path(lookup("HOME"))
    }

    /// Overwrite config values with whatever flags were given.
    ///
    /// Runs after env overrides so flags take precedence.
    pub fn apply_overrides(&self, config: &mut BrainConfig) {
        if let Some(ref host) = self.host {
            config.general.host = host.clone();
        }
        if let Some(port) = self.port {
            config.general.port = port;
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(ref dir) = self.model_dir {
            config.embedding.model_dir = dir.to_string_lossy().to_string();
        }
        if let Some(ref backend) = self.backend {
            config.embedding.backend = backend.clone();
        }
    }
}

/// Default config file path.
fn default_config_path(home: Option<String>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".brain").join("config.toml"),
        _ => PathBuf::from("config.toml"),
    }
}
