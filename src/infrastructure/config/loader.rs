use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {name} weight: {value}. Must be finite and >= 0")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Invalid tokens_per_cost_unit: {0}. Must be at least 1")]
    InvalidTokensPerCostUnit(u32),

    #[error("Temperature grid cannot be empty")]
    EmptyTemperatureGrid,

    #[error("Invalid temperature: {0}. Must be finite and >= 0")]
    InvalidTemperature(f64),

    #[error("Invalid top_p: {0}. Must be between 0 and 1")]
    InvalidTopP(f64),

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Invalid epochs: {0}. Must be at least 1")]
    InvalidEpochs(u32),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .prompt-bandit/config.yaml (project config)
    /// 3. .prompt-bandit/local.yaml (local overrides, optional)
    /// 4. Environment variables (PROMPT_BANDIT_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".prompt-bandit/config.yaml"))
            .merge(Yaml::file(".prompt-bandit/local.yaml"))
            .merge(Env::prefixed("PROMPT_BANDIT_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file (env overrides still apply)
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("PROMPT_BANDIT_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let scoring = &config.scoring;
        for (name, value) in [
            ("accuracy", scoring.accuracy_weight),
            ("coherence", scoring.coherence_weight),
            ("cost", scoring.cost_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        if scoring.tokens_per_cost_unit == 0 {
            return Err(ConfigError::InvalidTokensPerCostUnit(0));
        }

        let catalog = &config.catalog;
        if catalog.temperatures.is_empty() && catalog.arms_file.is_none() {
            return Err(ConfigError::EmptyTemperatureGrid);
        }
        if let Some(&t) = catalog
            .temperatures
            .iter()
            .find(|t| !t.is_finite() || **t < 0.0)
        {
            return Err(ConfigError::InvalidTemperature(t));
        }
        if !(0.0..=1.0).contains(&catalog.top_p) {
            return Err(ConfigError::InvalidTopP(catalog.top_p));
        }
        if catalog.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(0));
        }

        if config.run.epochs == 0 {
            return Err(ConfigError::InvalidEpochs(0));
        }
        if config.run.top_k == 0 {
            return Err(ConfigError::InvalidTopK(0));
        }

        if config.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(0));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
