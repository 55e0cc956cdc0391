// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake build service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BuildService, BuildServiceError, ProjectSpec};
use async_trait::async_trait;
use parking_lot::Mutex;
use sr_core::{
    BuildId, BuildInfo, BuildPhase, BuildStatus, PhaseContext, ProjectName, ACCESS_DENIED,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Recorded build service call
#[derive(Debug, Clone)]
pub enum BuildCall {
    CreateProject { spec: ProjectSpec },
    DeleteProject { name: ProjectName },
    StartBuild { project: ProjectName, buildspec: String },
    GetBuild { id: BuildId },
}

/// Status a fake build reports on one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeOutcome {
    pub status: BuildStatus,
    pub phases: Vec<BuildPhase>,
}

impl FakeOutcome {
    pub fn status(status: BuildStatus) -> Self {
        Self {
            status,
            phases: Vec::new(),
        }
    }

    pub fn running() -> Self {
        Self::status(BuildStatus::InProgress)
    }

    pub fn succeeded() -> Self {
        Self::status(BuildStatus::Succeeded)
    }

    /// Failed with a single phase context.
    pub fn failed(phase_type: &str, status_code: &str, message: &str) -> Self {
        Self {
            status: BuildStatus::Failed,
            phases: vec![BuildPhase {
                phase_type: phase_type.to_string(),
                phase_status: Some("CLIENT_ERROR".to_string()),
                contexts: vec![PhaseContext::new(status_code, message)],
            }],
        }
    }

    /// Failed because the service role had not propagated yet.
    pub fn access_denied() -> Self {
        Self::failed(
            "PROVISIONING",
            ACCESS_DENIED,
            "User: arn:aws:sts::123456789012:assumed-role/shardrun-service-role/AWSCodeBuild \
             is not authorized to perform: logs:CreateLogStream",
        )
    }
}

struct FakeBuild {
    project: ProjectName,
    buildspec: String,
    /// Pending outcomes; the last one sticks once the queue drains.
    outcomes: VecDeque<FakeOutcome>,
    current: FakeOutcome,
}

struct FakeBuildState {
    projects: HashMap<ProjectName, ProjectSpec>,
    builds: HashMap<BuildId, FakeBuild>,
    scripts: HashMap<usize, Vec<FakeOutcome>>,
    calls: Vec<BuildCall>,
    transient_create_failures: u32,
    status_failures: u32,
    /// Starts are rejected once this many builds have started
    start_rejection: Option<(usize, String)>,
    started: usize,
}

/// Fake build service for testing
///
/// Builds are numbered in start order (`build-1`, `build-2`, ...). Each
/// build replays the outcomes scripted for its ordinal, one per status
/// query; unscripted builds succeed immediately.
#[derive(Clone)]
pub struct FakeBuildService {
    inner: Arc<Mutex<FakeBuildState>>,
}

impl Default for FakeBuildService {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeBuildState {
                projects: HashMap::new(),
                builds: HashMap::new(),
                scripts: HashMap::new(),
                calls: Vec::new(),
                transient_create_failures: 0,
                status_failures: 0,
                start_rejection: None,
                started: 0,
            })),
        }
    }
}

impl FakeBuildService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcomes of the `ordinal`-th started build (1-based).
    pub fn script(&self, ordinal: usize, outcomes: Vec<FakeOutcome>) {
        self.inner.lock().scripts.insert(ordinal, outcomes);
    }

    /// Fail the next `times` project creations with a transient auth error.
    pub fn fail_project_creation(&self, times: u32) {
        self.inner.lock().transient_create_failures = times;
    }

    /// Fail the next `times` status queries with a request error.
    pub fn fail_status_queries(&self, times: u32) {
        self.inner.lock().status_failures = times;
    }

    /// Reject every subsequent build start with `message`.
    pub fn reject_starts(&self, message: &str) {
        self.reject_starts_after(0, message);
    }

    /// Accept the first `accepted` starts, then reject the rest.
    pub fn reject_starts_after(&self, accepted: usize, message: &str) {
        self.inner.lock().start_rejection = Some((accepted, message.to_string()));
    }

    /// Override the current outcome of a started build.
    pub fn set_outcome(&self, id: &str, outcome: FakeOutcome) {
        if let Some(build) = self.inner.lock().builds.get_mut(id) {
            build.outcomes.clear();
            build.current = outcome;
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BuildCall> {
        self.inner.lock().calls.clone()
    }

    /// Build spec a build was started with
    pub fn buildspec(&self, id: &str) -> Option<String> {
        self.inner.lock().builds.get(id).map(|b| b.buildspec.clone())
    }

    /// Project a build was started in
    pub fn build_project(&self, id: &str) -> Option<ProjectName> {
        self.inner.lock().builds.get(id).map(|b| b.project.clone())
    }

    pub fn project(&self, name: &str) -> Option<ProjectSpec> {
        self.inner.lock().projects.get(name).cloned()
    }

    pub fn started_builds(&self) -> usize {
        self.inner.lock().started
    }

    pub fn status_queries(&self, id: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, BuildCall::GetBuild { id: queried } if queried == id))
            .count()
    }
}

#[async_trait]
impl BuildService for FakeBuildService {
    async fn create_project(&self, spec: &ProjectSpec) -> Result<(), BuildServiceError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(BuildCall::CreateProject { spec: spec.clone() });

        if inner.transient_create_failures > 0 {
            inner.transient_create_failures -= 1;
            return Err(BuildServiceError::TransientAuth(
                "CodeBuild is not authorized to perform: sts:AssumeRole".to_string(),
            ));
        }
        if inner.projects.contains_key(&spec.name) {
            return Err(BuildServiceError::Rejected(format!(
                "project already exists: {}",
                spec.name
            )));
        }
        inner.projects.insert(spec.name.clone(), spec.clone());
        Ok(())
    }

    async fn delete_project(&self, name: &ProjectName) -> Result<(), BuildServiceError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(BuildCall::DeleteProject { name: name.clone() });
        inner.projects.remove(name);
        Ok(())
    }

    async fn start_build(
        &self,
        project: &ProjectName,
        buildspec: &str,
    ) -> Result<BuildId, BuildServiceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(BuildCall::StartBuild {
            project: project.clone(),
            buildspec: buildspec.to_string(),
        });

        if let Some((accepted, message)) = &inner.start_rejection {
            if inner.started >= *accepted {
                return Err(BuildServiceError::Rejected(message.clone()));
            }
        }
        if !inner.projects.contains_key(project) {
            return Err(BuildServiceError::NotFound(project.to_string()));
        }

        inner.started += 1;
        let ordinal = inner.started;
        let id = BuildId::new(format!("build-{}", ordinal));
        let mut outcomes: VecDeque<FakeOutcome> = inner
            .scripts
            .remove(&ordinal)
            .unwrap_or_default()
            .into();
        let current = outcomes.pop_front().unwrap_or_else(FakeOutcome::succeeded);

        inner.builds.insert(
            id.clone(),
            FakeBuild {
                project: project.clone(),
                buildspec: buildspec.to_string(),
                outcomes,
                current,
            },
        );
        Ok(id)
    }

    async fn get_build(&self, id: &BuildId) -> Result<BuildInfo, BuildServiceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(BuildCall::GetBuild { id: id.clone() });

        if inner.status_failures > 0 {
            inner.status_failures -= 1;
            return Err(BuildServiceError::Request("throttled".to_string()));
        }

        let build = inner
            .builds
            .get_mut(id)
            .ok_or_else(|| BuildServiceError::NotFound(id.to_string()))?;
        let outcome = build.current.clone();
        if let Some(next) = build.outcomes.pop_front() {
            build.current = next;
        }
        Ok(BuildInfo {
            id: id.clone(),
            status: outcome.status,
            phases: outcome.phases,
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
