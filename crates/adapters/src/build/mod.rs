// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote build service adapters

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BuildCall, FakeBuildService, FakeOutcome};

use async_trait::async_trait;
use serde::Serialize;
use sr_core::{BuildId, BuildInfo, EnvVar, ProjectName};
use thiserror::Error;

/// Errors from the remote build service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildServiceError {
    /// The service could not assume the freshly created role yet.
    #[error("role not yet assumable: {0}")]
    TransientAuth(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("build not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl BuildServiceError {
    pub fn is_transient_auth(&self) -> bool {
        matches!(self, BuildServiceError::TransientAuth(_))
    }
}

/// Everything the remote service needs to create a project for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSpec {
    pub name: ProjectName,
    /// `container/archive` of the staged source
    pub source_location: String,
    /// Container that build outputs are written to, namespaced by build id
    pub artifact_container: String,
    pub image: String,
    pub compute_type: String,
    pub environment_variables: Vec<EnvVar>,
    pub service_role: String,
    pub timeout_minutes: u32,
}

/// Adapter for the remote build execution service
#[async_trait]
pub trait BuildService: Clone + Send + Sync + 'static {
    /// Create the project that every build of a run belongs to
    async fn create_project(&self, spec: &ProjectSpec) -> Result<(), BuildServiceError>;

    /// Delete a project
    async fn delete_project(&self, name: &ProjectName) -> Result<(), BuildServiceError>;

    /// Start a build with the given build spec, returning its identity
    ///
    /// The returned id is what status queries take. Outputs are addressed by
    /// the bare per-build part; a `project:` qualifier is dropped when the
    /// result key is composed.
    async fn start_build(
        &self,
        project: &ProjectName,
        buildspec: &str,
    ) -> Result<BuildId, BuildServiceError>;

    /// Fetch the current status of a build
    async fn get_build(&self, id: &BuildId) -> Result<BuildInfo, BuildServiceError>;
}
