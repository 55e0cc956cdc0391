// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run resource names, all derived from one timestamp.

use crate::id::{BuildId, ProjectName};
use serde::Serialize;

/// Default prefix for every remote resource a run creates.
pub const DEFAULT_PREFIX: &str = "shardrun";

/// Basenames of the three output objects each build writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputNames {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: String,
}

impl OutputNames {
    /// Object key of `basename` for one build: `<build>/<project>/<basename>`.
    pub fn object_key(project: &str, build: &str, basename: &str) -> String {
        format!("{}/{}/{}", build, project, basename)
    }
}

/// Names of every resource belonging to one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunNames {
    pub timestamp: u64,
    pub project: ProjectName,
    pub result_container: String,
    pub source_container: String,
    pub source_archive: String,
    pub role: String,
    pub policy: String,
    pub outputs: OutputNames,
}

impl RunNames {
    pub fn new(prefix: &str, timestamp: u64) -> Self {
        let artifact = format!("{prefix}_artifact_{timestamp}");
        Self {
            timestamp,
            project: ProjectName::new(format!("{prefix}-executor-{timestamp}")),
            result_container: format!("{prefix}-artifact-store-{timestamp}"),
            source_container: format!("{prefix}-source-store-{timestamp}"),
            source_archive: format!("{prefix}_source_{timestamp}.tar.zst"),
            role: format!("{prefix}-service-role-{timestamp}"),
            policy: format!("{prefix}-service-policy-{timestamp}"),
            outputs: OutputNames {
                stdout: format!("{artifact}_stdout.txt"),
                stderr: format!("{artifact}_stderr.txt"),
                exit_status: format!("{artifact}_exit_status.txt"),
            },
        }
    }

    /// Location of the staged source archive: `container/archive`.
    pub fn source_location(&self) -> String {
        format!("{}/{}", self.source_container, self.source_archive)
    }

    /// Object keys of the three outputs of `build`, in stdout/stderr/exit order.
    pub fn output_keys(&self, build: &BuildId) -> [String; 3] {
        let project = self.project.as_str();
        [
            OutputNames::object_key(project, build.as_str(), &self.outputs.stdout),
            OutputNames::object_key(project, build.as_str(), &self.outputs.stderr),
            OutputNames::object_key(project, build.as_str(), &self.outputs.exit_status),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_share_one_timestamp() {
        let names = RunNames::new(DEFAULT_PREFIX, 1483228800);
        assert_eq!(names.project, "shardrun-executor-1483228800");
        assert_eq!(names.result_container, "shardrun-artifact-store-1483228800");
        assert_eq!(names.role, "shardrun-service-role-1483228800");
        assert_eq!(names.policy, "shardrun-service-policy-1483228800");
        assert_eq!(
            names.outputs.exit_status,
            "shardrun_artifact_1483228800_exit_status.txt"
        );
        assert_eq!(
            names.source_location(),
            "shardrun-source-store-1483228800/shardrun_source_1483228800.tar.zst"
        );
    }

    #[test]
    fn output_keys_nest_build_then_project() {
        let names = RunNames::new("t", 7);
        let [stdout, stderr, exit] = names.output_keys(&BuildId::new("b-1"));
        assert_eq!(stdout, "b-1/t-executor-7/t_artifact_7_stdout.txt");
        assert_eq!(stderr, "b-1/t-executor-7/t_artifact_7_stderr.txt");
        assert_eq!(exit, "b-1/t-executor-7/t_artifact_7_exit_status.txt");
    }
}
