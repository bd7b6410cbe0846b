//! Configuration loading and management
//!
//! Handles parsing of `.triage.toml` configuration files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::scoring::{ScoringOptions, Strategy, WeightOverride};

pub const CONFIG_FILE: &str = ".triage.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scoring defaults
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Suggestion defaults
    #[serde(default)]
    pub suggest: SuggestConfig,

    /// Session store configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// Scoring-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Strategy used when `--strategy` is not given
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Partial weight override applied before any `--weights`
    #[serde(default, skip_serializing_if = "WeightOverride::is_empty")]
    pub weights: WeightOverride,
}

fn default_strategy() -> String {
    Strategy::default().as_str().to_string()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            weights: WeightOverride::default(),
        }
    }
}

/// Suggestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Number of tasks returned by `triage suggest`
    #[serde(default = "default_suggest_limit")]
    pub limit: usize,
}

fn default_suggest_limit() -> usize {
    crate::analysis::DEFAULT_SUGGESTION_LIMIT
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            limit: default_suggest_limit(),
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Save `analyze` results for `suggest`
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long to wait for the session lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl ScoringConfig {
    /// Scoring options from config, optionally overridden from the command line.
    ///
    /// An unknown `cli_strategy` falls back to `smart`; the config strategy is
    /// validated at load time.
    pub fn options(
        &self,
        cli_strategy: Option<&str>,
        cli_weights: Option<WeightOverride>,
    ) -> ScoringOptions {
        let strategy = Strategy::resolve(cli_strategy.unwrap_or(&self.strategy));
        let overrides = match cli_weights {
            Some(weights) => self.weights.merge(weights),
            None => self.weights,
        };
        ScoringOptions::new(strategy).with_overrides(overrides)
    }

    fn validate(&self) -> Result<()> {
        if Strategy::from_name(&self.strategy).is_none() {
            return Err(Error::InvalidConfig(format!(
                "scoring.strategy: unknown strategy '{}' (expected smart|fastest|impact|deadline)",
                self.strategy
            )));
        }

        let entries = [
            ("u", self.weights.u),
            ("i", self.weights.i),
            ("e", self.weights.e),
            ("d", self.weights.d),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(Error::InvalidConfig(format!(
                        "scoring.weights.{key} must be a finite number"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from a `.triage.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a working directory, or return defaults.
    ///
    /// The second value is a user-facing warning when an existing file was
    /// discarded.
    pub fn load_or_default(dir: &Path) -> (Self, Option<String>) {
        let config_path = Self::path_in(dir);
        if !config_path.exists() {
            return (Self::default(), None);
        }
        match Self::load(&config_path) {
            Ok(config) => (config, None),
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "ignoring invalid configuration"
                );
                let warning = format!("ignoring {}: {err}; using defaults", config_path.display());
                (Self::default(), Some(warning))
            }
        }
    }

    /// Path to the config file inside `dir`
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.suggest.limit == 0 {
            return Err(Error::InvalidConfig("suggest.limit must be > 0".to_string()));
        }
        if self.session.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig("session.lock_timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }
}
