// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out shapes and per-build outcomes of complete runs.

use super::*;
use sr_adapters::FakeOutcome;
use sr_core::{BuildSpecTemplate, BuildStatus, PhaseError};
use sr_engine::{execute, Orchestrator, Slot};

#[tokio::test]
async fn single_unit_covers_every_file() {
    let dir = project(3);
    let deps = deps();
    write_outputs(
        &deps,
        "build-1",
        Some("3 examples, 0 failures\n"),
        Some(""),
        Some("0\n"),
    );

    let outcome = execute(deps.clone(), &config(1), dir.path(), &clock())
        .await
        .unwrap();

    assert_eq!(outcome.units.len(), 1);
    let buildspec = deps.builds.buildspec("build-1").unwrap();
    assert!(buildspec.contains("bundle exec rspec spec/a_spec.rb spec/b_spec.rb spec/c_spec.rb 1> "));

    let unit = &outcome.units[0];
    assert_eq!(unit.key.to_string(), key("build-1"));
    assert_eq!(unit.stdout, Slot::Found("3 examples, 0 failures\n".to_string()));
    assert_eq!(unit.stderr, Slot::Found(String::new()));
    assert_eq!(unit.exit_status, Slot::Found("0\n".to_string()));
    assert!(unit.success());
    assert_eq!(outcome.exit_code, 0);
}

#[tokio::test]
async fn two_units_split_in_file_order() {
    let dir = project(3);
    let deps = deps();
    write_outputs(&deps, "build-1", Some("2 examples"), None, Some("0"));
    write_outputs(&deps, "build-2", Some("1 example"), None, Some("0"));

    let outcome = execute(deps.clone(), &config(2), dir.path(), &clock())
        .await
        .unwrap();

    let first = deps.builds.buildspec("build-1").unwrap();
    let second = deps.builds.buildspec("build-2").unwrap();
    assert!(first.contains("rspec spec/a_spec.rb spec/b_spec.rb 1> "));
    assert!(second.contains("rspec spec/c_spec.rb 1> "));

    let keys: Vec<_> = outcome.units.iter().map(|u| u.key.to_string()).collect();
    assert_eq!(keys, vec![key("build-1"), key("build-2")]);
    assert!(outcome.units.iter().all(|u| u.success()));
}

#[tokio::test]
async fn access_denied_unit_is_replaced_by_its_retry() {
    let dir = project(1);
    let deps = deps();
    deps.builds.script(1, vec![FakeOutcome::access_denied()]);
    write_outputs(&deps, "build-2", Some("1 example"), Some(""), Some("0"));

    let outcome = execute(deps.clone(), &config(1), dir.path(), &clock())
        .await
        .unwrap();

    assert_eq!(deps.builds.started_builds(), 2);
    assert_eq!(outcome.units.len(), 1);
    assert_eq!(outcome.units[0].key.to_string(), key("build-2"));
    assert_eq!(outcome.units[0].stdout, Slot::Found("1 example".to_string()));
    assert!(!outcome.report.contains("build-1"));
    assert_eq!(outcome.exit_code, 0);
}

#[tokio::test]
async fn command_failure_is_reported_not_retried() {
    let deps = deps();
    deps.builds.script(
        1,
        vec![
            FakeOutcome::running(),
            FakeOutcome::failed(
                "BUILD",
                "COMMAND_EXECUTION_ERROR",
                "Error while executing command: bundle exec rspec. Reason: exit status 127",
            ),
        ],
    );
    write_outputs(&deps, "build-1", Some("Loading gems"), None, None);

    let names = names();
    let orchestrator = Orchestrator::new(
        deps.clone(),
        config(1),
        names.clone(),
        BuildSpecTemplate::Default,
    );
    let mut outcome = orchestrator
        .run(&names.source_location(), &spec_files(2))
        .await
        .unwrap();

    assert_eq!(deps.builds.started_builds(), 1);
    let unit = &mut outcome.units[0];
    assert_eq!(unit.retry_count(), 0);
    assert_eq!(unit.status().await.unwrap(), BuildStatus::Failed);
    assert_eq!(
        unit.errors().await.unwrap(),
        vec![PhaseError {
            phase_type: "BUILD".to_string(),
            phase_status: "CLIENT_ERROR".to_string(),
            status: "COMMAND_EXECUTION_ERROR".to_string(),
            message: "Error while executing command: bundle exec rspec. Reason: exit status 127"
                .to_string(),
        }]
    );

    let entry = outcome
        .results
        .entry(&sr_core::ResultKey::new(key("build-1")))
        .unwrap();
    assert_eq!(entry.stdout, Slot::Found("Loading gems".to_string()));
    assert_eq!(entry.stderr, Slot::NotFound);
    assert_eq!(entry.exit_status, Slot::NotFound);
}
