// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One remote build covering one partition of the target files.

use crate::error::UnitError;
use sr_adapters::BuildService;
use sr_core::{BuildId, BuildInfo, BuildStatus, PhaseError, ProjectName, ResultKey};

/// A shard of the run: owns its partition and tracks the remote build
/// currently executing it.
///
/// The remote status is fetched lazily and cached until [`refresh`] is
/// called, so repeated queries within one poll tick hit the service once.
///
/// [`refresh`]: BuildUnit::refresh
pub struct BuildUnit<B> {
    service: B,
    project: ProjectName,
    targets: Vec<String>,
    buildspec: String,
    build_id: Option<BuildId>,
    cached: Option<BuildInfo>,
    retry_count: u32,
    retry_limit: u32,
}

impl<B: BuildService> BuildUnit<B> {
    /// An unstarted unit; `buildspec` is resubmitted verbatim on every retry.
    pub fn new(
        service: B,
        project: ProjectName,
        targets: Vec<String>,
        buildspec: String,
        retry_limit: u32,
    ) -> Self {
        Self {
            service,
            project,
            targets,
            buildspec,
            build_id: None,
            cached: None,
            retry_count: 0,
            retry_limit,
        }
    }

    /// Submit the build and record its identity.
    pub async fn launch(&mut self) -> Result<&BuildId, UnitError> {
        let id = self
            .service
            .start_build(&self.project, &self.buildspec)
            .await
            .map_err(UnitError::Submission)?;
        tracing::info!(build_id = %id, files = self.targets.len(), "started build");
        self.cached = None;
        Ok(self.build_id.insert(id))
    }

    /// Drop the cached status so the next query re-fetches it.
    pub fn refresh(&mut self) {
        self.cached = None;
    }

    /// Current remote status, fetched on first use after a launch or refresh.
    pub async fn status(&mut self) -> Result<BuildStatus, UnitError> {
        Ok(self.info().await?.status)
    }

    /// Status as of the last successful fetch, if it is still cached.
    pub fn cached_status(&self) -> Option<BuildStatus> {
        self.cached.as_ref().map(|info| info.status)
    }

    pub fn retriable(&self) -> bool {
        self.retry_count < self.retry_limit
    }

    /// Count an attempt and resubmit the same partition under a new identity.
    pub async fn retry(&mut self) -> Result<&BuildId, UnitError> {
        self.retry_count += 1;
        if let Some(id) = &self.build_id {
            tracing::info!(build_id = %id, attempt = self.retry_count, "retrying build");
        }
        self.launch().await
    }

    /// Failed because the freshly created role had not propagated yet.
    pub async fn access_denied(&mut self) -> Result<bool, UnitError> {
        let info = self.info().await?;
        Ok(info.status == BuildStatus::Failed && info.has_access_denied_race())
    }

    /// Structured failure contexts; empty unless the build failed.
    pub async fn errors(&mut self) -> Result<Vec<PhaseError>, UnitError> {
        let info = self.info().await?;
        if info.status == BuildStatus::Failed {
            Ok(info.phase_errors())
        } else {
            Ok(Vec::new())
        }
    }

    pub fn build_id(&self) -> Option<&BuildId> {
        self.build_id.as_ref()
    }

    /// Result store key of the current attempt.
    pub fn result_key(&self) -> Option<ResultKey> {
        self.build_id
            .as_ref()
            .map(|id| ResultKey::compose(&self.project, id))
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    async fn info(&mut self) -> Result<&BuildInfo, UnitError> {
        let id = self.build_id.as_ref().ok_or(UnitError::NotLaunched)?;
        let info = match self.cached.take() {
            Some(info) => info,
            None => self
                .service
                .get_build(id)
                .await
                .map_err(|source| UnitError::Status {
                    id: id.to_string(),
                    source,
                })?,
        };
        Ok(self.cached.insert(info))
    }
}

#[cfg(test)]
#[path = "unit_tests.rs"]
mod tests;
