// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const LOG_STREAM_DENIAL: &str = "Service role arn:aws:iam::123456789012:role/shardrun-service-role-1493887235 \
does not allow AWS CodeBuild to create Amazon CloudWatch Logs log streams for build. \
Error message: User: arn:aws:sts::123456789012:assumed-role/shardrun-service-role-1493887235/AWSCodeBuild \
is not authorized to perform: logs:CreateLogStream";

#[yare::parameterized(
    in_progress = { "IN_PROGRESS", BuildStatus::InProgress },
    succeeded   = { "SUCCEEDED", BuildStatus::Succeeded },
    failed      = { "FAILED", BuildStatus::Failed },
    timed_out   = { "TIMED_OUT", BuildStatus::TimedOut },
    stopped     = { "STOPPED", BuildStatus::Stopped },
)]
fn status_parses_wire_names(wire: &str, expected: BuildStatus) {
    let parsed: BuildStatus = wire.parse().unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(parsed.as_str(), wire);
}

#[test]
fn status_rejects_unknown_wire_name() {
    let err = "QUEUED".parse::<BuildStatus>().unwrap_err();
    assert_eq!(err, UnknownStatus("QUEUED".to_string()));
}

#[yare::parameterized(
    in_progress = { BuildStatus::InProgress, false },
    succeeded   = { BuildStatus::Succeeded, true },
    failed      = { BuildStatus::Failed, true },
    timed_out   = { BuildStatus::TimedOut, true },
    stopped     = { BuildStatus::Stopped, true },
)]
fn status_terminality(status: BuildStatus, terminal: bool) {
    assert_eq!(status.is_terminal(), terminal);
    assert_eq!(status.is_running(), !terminal);
}

#[test]
fn status_serializes_as_wire_name() {
    let json = serde_json::to_string(&BuildStatus::TimedOut).unwrap();
    assert_eq!(json, "\"TIMED_OUT\"");
}

#[yare::parameterized(
    log_stream   = { ACCESS_DENIED, LOG_STREAM_DENIAL, true },
    assume_role  = { ACCESS_DENIED, "Not authorized to perform sts:AssumeRole", true },
    other_denial = { ACCESS_DENIED, "bucket policy forbids access", false },
    other_code   = { "CLIENT_ERROR", "is not authorized to perform: s3:GetObject", false },
)]
fn access_denied_race_predicate(code: &str, message: &str, expected: bool) {
    assert_eq!(is_access_denied_race(&PhaseContext::new(code, message)), expected);
}

#[test]
fn phase_errors_flatten_contexts_and_skip_empty_phases() {
    let info = BuildInfo::new("b-1", BuildStatus::Failed)
        .with_phase(BuildPhase {
            phase_type: "SUBMITTED".to_string(),
            phase_status: Some("SUCCEEDED".to_string()),
            contexts: vec![],
        })
        .with_phase(BuildPhase {
            phase_type: "DOWNLOAD_SOURCE".to_string(),
            phase_status: Some("CLIENT_ERROR".to_string()),
            contexts: vec![PhaseContext::new(
                "BUILD_CONTAINER_UNABLE_TO_PULL_IMAGE",
                "Unable to pull customer's container image.",
            )],
        });

    assert_eq!(
        info.phase_errors(),
        vec![PhaseError {
            phase_type: "DOWNLOAD_SOURCE".to_string(),
            phase_status: "CLIENT_ERROR".to_string(),
            status: "BUILD_CONTAINER_UNABLE_TO_PULL_IMAGE".to_string(),
            message: "Unable to pull customer's container image.".to_string(),
        }]
    );
    assert!(!info.has_access_denied_race());
}

#[test]
fn build_info_detects_race_in_any_phase() {
    let info = BuildInfo::new("b-1", BuildStatus::Failed).with_phase(BuildPhase {
        phase_type: "PROVISIONING".to_string(),
        phase_status: Some("FAILED".to_string()),
        contexts: vec![PhaseContext::new(ACCESS_DENIED, LOG_STREAM_DENIAL)],
    });
    assert!(info.has_access_denied_race());
}
