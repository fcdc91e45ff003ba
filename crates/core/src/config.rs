// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller configuration.
//!
//! Built once at startup and handed to the reconciler. Holds the identifiers
//! that tie child jobs to their scheduled job (owner type, index key,
//! scheduled-time annotation) and the bounds on a single reconcile.

use crate::env;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default cap on missed runs enumerated in one pass.
pub const DEFAULT_MAX_MISSED_RUNS: u32 = 100;

/// Default per-call store timeout.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Controller-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// API version of the owning scheduled-job type, stamped on owner links
    pub api_version: String,
    /// Kind of the owning scheduled-job type, stamped on owner links
    pub kind: String,
    /// Field index mapping a child job to its controlling owner's name
    pub owner_index_key: String,
    /// Annotation recording the nominal run time a child job realizes
    pub scheduled_time_annotation: String,
    /// Missed runs tolerated before a reconcile gives up catching up
    pub max_missed_runs: u32,
    /// Per-call store timeout in milliseconds; `None` disables the timeout
    pub store_timeout_ms: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            api_version: "batch.tutorial.kubebuilder.io/v1".to_string(),
            kind: "CronJob".to_string(),
            owner_index_key: ".metadata.controller".to_string(),
            scheduled_time_annotation: "batch.tutorial.kubebuilder.io/scheduled-at".to_string(),
            max_missed_runs: DEFAULT_MAX_MISSED_RUNS,
            store_timeout_ms: Some(DEFAULT_STORE_TIMEOUT.as_millis() as u64),
        }
    }
}

impl ControllerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration: `CJ_CONFIG` file if set, else defaults, then
    /// `CJ_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Apply `CJ_MAX_MISSED_RUNS` and `CJ_STORE_TIMEOUT_MS` overrides.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(max) = env::max_missed_runs() {
            self.max_missed_runs = max;
        }
        if let Some(timeout) = env::store_timeout() {
            self.store_timeout_ms = Some(timeout.as_millis() as u64);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn store_timeout(&self) -> Option<Duration> {
        self.store_timeout_ms.map(Duration::from_millis)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("api_version", &self.api_version),
            ("kind", &self.kind),
            ("owner_index_key", &self.owner_index_key),
            ("scheduled_time_annotation", &self.scheduled_time_annotation),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if self.max_missed_runs == 0 {
            return Err(ConfigError::Invalid {
                field: "max_missed_runs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.store_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                field: "store_timeout_ms",
                reason: "must be positive (omit to disable)".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
