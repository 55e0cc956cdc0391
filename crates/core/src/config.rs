// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration, loaded from TOML and validated before anything remote
//! is created.

use crate::command::BuildSpecTemplate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Allowed build timeout, in minutes.
pub const TIMEOUT_RANGE: std::ops::RangeInclusive<u32> = 5..=480;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid concurrency: it should be bigger than 0, got: {0}")]
    Concurrency(usize),
    #[error("invalid timeout range: it should be between 5 and 480, got: {0}")]
    Timeout(u32),
    #[error("invalid location of custom buildspec, got: {0}")]
    Buildspec(String),
    #[error("invalid file pattern '{pattern}': {message}")]
    FilePattern { pattern: String, message: String },
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("no target files match '{0}'")]
    NoTargets(String),
}

/// Size of the remote compute instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeType {
    #[default]
    Small,
    Medium,
    Large,
}

impl ComputeType {
    /// Name understood by the remote build service.
    pub fn remote_name(self) -> &'static str {
        match self {
            ComputeType::Small => "BUILD_GENERAL1_SMALL",
            ComputeType::Medium => "BUILD_GENERAL1_MEDIUM",
            ComputeType::Large => "BUILD_GENERAL1_LARGE",
        }
    }
}

impl fmt::Display for ComputeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.remote_name())
    }
}

/// Name/value pair handed to the remote container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

fn default_concurrency() -> usize {
    1
}

fn default_timeout() -> u32 {
    60
}

fn default_file_pattern() -> String {
    "**/*".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

fn default_retry_limit() -> u32 {
    3
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_project_retry_limit() -> u32 {
    10
}

fn default_project_retry_delay_ms() -> u64 {
    5_000
}

/// Configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Container image the builds run in
    pub image: String,
    /// Command tokens; `FILES` expands to the unit's file list
    pub commands: Vec<String>,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub compute_type: ComputeType,
    /// Per-build timeout in minutes, enforced remotely
    #[serde(default = "default_timeout")]
    pub timeout: u32,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Custom build-spec template file
    #[serde(default)]
    pub buildspec: Option<PathBuf>,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    /// Keep every remote resource after the run for inspection
    #[serde(default)]
    pub debug: bool,
    /// Report formatter key
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_project_retry_limit")]
    pub project_retry_limit: u32,
    #[serde(default = "default_project_retry_delay_ms")]
    pub project_retry_delay_ms: u64,
}

impl RunConfig {
    /// Minimal config with every optional field at its default.
    pub fn new(image: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            image: image.into(),
            commands,
            concurrency: default_concurrency(),
            compute_type: ComputeType::default(),
            timeout: default_timeout(),
            env: BTreeMap::new(),
            buildspec: None,
            file_pattern: default_file_pattern(),
            debug: false,
            format: default_format(),
            retry_limit: default_retry_limit(),
            poll_interval_ms: default_poll_interval_ms(),
            project_retry_limit: default_project_retry_limit(),
            project_retry_delay_ms: default_project_retry_delay_ms(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Check every field; runs before any remote resource is created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image.trim().is_empty() {
            return Err(ConfigError::Missing("image"));
        }
        if self.commands.is_empty() {
            return Err(ConfigError::Missing("commands"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Concurrency(self.concurrency));
        }
        if !TIMEOUT_RANGE.contains(&self.timeout) {
            return Err(ConfigError::Timeout(self.timeout));
        }
        if let Some(path) = &self.buildspec {
            if !path.is_file() {
                return Err(ConfigError::Buildspec(path.display().to_string()));
            }
        }
        glob::Pattern::new(&self.file_pattern).map_err(|e| ConfigError::FilePattern {
            pattern: self.file_pattern.clone(),
            message: e.msg.to_string(),
        })?;
        Ok(())
    }

    /// Environment variables in name order.
    pub fn environment_variables(&self) -> Vec<EnvVar> {
        self.env
            .iter()
            .map(|(name, value)| EnvVar {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    }

    /// Load the build-spec template this config selects.
    pub fn buildspec_template(&self) -> Result<BuildSpecTemplate, ConfigError> {
        match &self.buildspec {
            None => Ok(BuildSpecTemplate::Default),
            Some(path) => std::fs::read_to_string(path)
                .map(BuildSpecTemplate::Custom)
                .map_err(|_| ConfigError::Buildspec(path.display().to_string())),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn project_retry_delay(&self) -> Duration {
        Duration::from_millis(self.project_retry_delay_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
