// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use sr_adapters::{BlobError, BuildServiceError, IdentityError};
use sr_core::{ConfigError, PartitionError};
use thiserror::Error;

/// Errors from a single build unit
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("build unit has not been launched")]
    NotLaunched,
    /// The remote service refused to start the build.
    #[error("submission rejected: {0}")]
    Submission(#[source] BuildServiceError),
    #[error("status lookup failed for {id}: {source}")]
    Status {
        id: String,
        source: BuildServiceError,
    },
}

/// Errors from creating or deleting the permission grant
#[derive(Debug, Error)]
pub enum GrantError {
    #[error("failed to create {resource}: {source}")]
    Create {
        resource: &'static str,
        source: IdentityError,
    },
    #[error("failed to delete {resource}: {source}")]
    Delete {
        resource: &'static str,
        source: IdentityError,
    },
}

/// Errors from staging the source archive
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
    #[error("no target files match '{0}'")]
    NoTargets(String),
    #[error("failed to archive source: {0}")]
    Archive(#[from] std::io::Error),
    #[error("archive task failed: {0}")]
    Task(String),
    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),
}

/// Errors that abort an orchestrated run
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("result store error: {0}")]
    Results(#[source] BlobError),
    #[error("permission grant error: {0}")]
    Grant(#[from] GrantError),
    #[error("project creation failed after {attempts} attempts: {source}")]
    Project {
        attempts: u32,
        source: BuildServiceError,
    },
    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),
    #[error("failed to render build spec: {0}")]
    BuildSpec(#[from] serde_yaml::Error),
    #[error("failed to launch build unit: {0}")]
    Launch(#[from] UnitError),
}

/// Errors from an end-to-end run
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("unknown report format: {0}")]
    UnknownFormat(String),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}
