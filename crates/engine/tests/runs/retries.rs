// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access-denied retries and result key bookkeeping.

use super::*;
use sr_adapters::FakeOutcome;
use sr_core::{BuildStatus, ResultKey};
use sr_engine::{execute, ResultStore};

#[tokio::test]
async fn retry_ceiling_leaves_unit_failed() {
    let dir = project(1);
    let deps = deps();
    for ordinal in 1..=4 {
        deps.builds.script(ordinal, vec![FakeOutcome::access_denied()]);
    }
    let mut config = config(1);
    config.retry_limit = 3;

    let outcome = execute(deps.clone(), &config, dir.path(), &clock())
        .await
        .unwrap();

    assert_eq!(deps.builds.started_builds(), 4);
    let unit = &outcome.units[0];
    assert_eq!(unit.key.to_string(), key("build-4"));
    assert_eq!(unit.status, Some(BuildStatus::Failed));
    assert!(!unit.success());
    assert_eq!(outcome.exit_code, 1);
}

#[tokio::test]
async fn zero_retry_limit_never_resubmits() {
    let dir = project(1);
    let deps = deps();
    deps.builds.script(1, vec![FakeOutcome::access_denied()]);
    let mut config = config(1);
    config.retry_limit = 0;

    let outcome = execute(deps.clone(), &config, dir.path(), &clock())
        .await
        .unwrap();

    assert_eq!(deps.builds.started_builds(), 1);
    assert_eq!(outcome.units[0].key.to_string(), key("build-1"));
}

#[tokio::test]
async fn replacing_a_key_keeps_registry_size() {
    let store = ResultStore::create(FakeBlobStore::new(), "results", names().outputs)
        .await
        .unwrap();
    for build in ["a", "b", "c"] {
        assert!(store.register(ResultKey::new(key(build))));
    }

    store.replace(&ResultKey::new(key("b")), ResultKey::new(key("d")));

    let keys = store.keys();
    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&ResultKey::new(key("d"))));
    assert!(!keys.contains(&ResultKey::new(key("b"))));
}

#[tokio::test]
async fn only_one_unit_is_retried() {
    let dir = project(2);
    let deps = deps();
    deps.builds.script(2, vec![FakeOutcome::access_denied()]);

    let outcome = execute(deps.clone(), &config(2), dir.path(), &clock())
        .await
        .unwrap();

    let keys: Vec<_> = outcome.units.iter().map(|u| u.key.to_string()).collect();
    assert_eq!(keys, vec![key("build-1"), key("build-3")]);
    assert_eq!(
        deps.builds.buildspec("build-3"),
        deps.builds.buildspec("build-2")
    );
}
