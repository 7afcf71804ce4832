//! Configuration resolution for startup.
//!
//! The config file, environment and flags are resolved before the tracing
//! subscriber exists (the configured log level feeds the filter), so
//! anything that went wrong is collected in [`LoadedConfig`] and reported
//! afterwards with [`LoadedConfig::report`].

use std::path::PathBuf;

use brain_core::config::{BrainConfig, ConfigOrigin, RejectedOverride};
use tracing::{info, warn};

use crate::cli::CliArgs;

/// Fully resolved configuration plus what happened while resolving it.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: BrainConfig,
    pub path: PathBuf,
    pub origin: ConfigOrigin,
    pub rejected_env: Vec<RejectedOverride>,
}

impl LoadedConfig {
    /// Resolve config in priority order: file, then env, then flags.
    pub fn resolve<F>(args: &CliArgs, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = args.resolve_config_path(&lookup);
        let (mut config, origin) = BrainConfig::load_or_default(&path);
        let rejected_env = config.apply_env_overrides(&lookup);
        args.apply_overrides(&mut config);

        Self {
            config,
            path,
            origin,
            rejected_env,
        }
    }

    /// Log the outcome of [`LoadedConfig::resolve`].
    pub fn report(&self) {
        match &self.origin {
            ConfigOrigin::File => {
                info!(path = %self.path.display(), "Configuration loaded");
            }
            ConfigOrigin::Missing => {
                info!(path = %self.path.display(), "No configuration file; using defaults");
            }
            ConfigOrigin::Rejected(reason) => {
                warn!(
                    path = %self.path.display(),
                    error = %reason,
                    "Failed to load configuration file; using defaults"
                );
            }
        }

        for rejected in &self.rejected_env {
            warn!(
                key = rejected.key,
                value = %rejected.value,
                error = %rejected.reason,
                "Ignoring environment override"
            );
        }
    }
}
