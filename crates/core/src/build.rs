// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote build status and failure context.

use crate::id::BuildId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status code the remote service attaches to authorization failures.
pub const ACCESS_DENIED: &str = "ACCESS_DENIED";

/// Message fragments that mark an authorization failure as the
/// permission-propagation race rather than a real misconfiguration.
const ACCESS_DENIED_RACE_PHRASES: &[&str] =
    &["is not authorized to perform", "Not authorized to perform"];

/// Phase of a remote build as reported by the build service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    InProgress,
    Succeeded,
    Failed,
    TimedOut,
    Stopped,
}

impl BuildStatus {
    pub fn is_running(self) -> bool {
        matches!(self, BuildStatus::InProgress)
    }

    /// Terminal statuses never change without an explicit retry.
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    pub fn is_success(self) -> bool {
        matches!(self, BuildStatus::Succeeded)
    }

    /// Wire name used by the remote service.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildStatus::InProgress => "IN_PROGRESS",
            BuildStatus::Succeeded => "SUCCEEDED",
            BuildStatus::Failed => "FAILED",
            BuildStatus::TimedOut => "TIMED_OUT",
            BuildStatus::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildStatus::InProgress => "running",
            BuildStatus::Succeeded => "succeeded",
            BuildStatus::Failed => "failed",
            BuildStatus::TimedOut => "timed-out",
            BuildStatus::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Error returned when the remote service reports a status we don't know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown build status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for BuildStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(BuildStatus::InProgress),
            "SUCCEEDED" => Ok(BuildStatus::Succeeded),
            "FAILED" => Ok(BuildStatus::Failed),
            "TIMED_OUT" => Ok(BuildStatus::TimedOut),
            "STOPPED" => Ok(BuildStatus::Stopped),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Structured failure detail attached to a build phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseContext {
    pub status_code: String,
    pub message: String,
}

impl PhaseContext {
    pub fn new(status_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            message: message.into(),
        }
    }
}

/// One phase of a remote build (download source, build, upload artifacts, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPhase {
    pub phase_type: String,
    pub phase_status: Option<String>,
    #[serde(default)]
    pub contexts: Vec<PhaseContext>,
}

/// Snapshot of a remote build returned by a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub id: BuildId,
    pub status: BuildStatus,
    #[serde(default)]
    pub phases: Vec<BuildPhase>,
}

impl BuildInfo {
    pub fn new(id: impl Into<BuildId>, status: BuildStatus) -> Self {
        Self {
            id: id.into(),
            status,
            phases: Vec::new(),
        }
    }

    pub fn with_phase(mut self, phase: BuildPhase) -> Self {
        self.phases.push(phase);
        self
    }

    /// True when any phase carries the permission-propagation denial.
    pub fn has_access_denied_race(&self) -> bool {
        self.phases
            .iter()
            .flat_map(|phase| phase.contexts.iter())
            .any(is_access_denied_race)
    }

    /// Flatten every phase context into a diagnostic entry.
    pub fn phase_errors(&self) -> Vec<PhaseError> {
        self.phases
            .iter()
            .flat_map(|phase| {
                phase.contexts.iter().map(move |ctx| PhaseError {
                    phase_type: phase.phase_type.clone(),
                    phase_status: phase.phase_status.clone().unwrap_or_default(),
                    status: ctx.status_code.clone(),
                    message: ctx.message.clone(),
                })
            })
            .collect()
    }
}

/// Diagnostic entry for a failed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseError {
    pub phase_type: String,
    pub phase_status: String,
    pub status: String,
    pub message: String,
}

/// Whether a phase context is the transient denial seen while a freshly
/// created role is still propagating.
///
/// The phrases are platform heuristics with no stability guarantee; keep
/// every caller going through this function.
pub fn is_access_denied_race(ctx: &PhaseContext) -> bool {
    ctx.status_code == ACCESS_DENIED
        && ACCESS_DENIED_RACE_PHRASES
            .iter()
            .any(|phrase| ctx.message.contains(phrase))
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
