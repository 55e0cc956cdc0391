// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fetching build outputs when some of them are missing.

use super::*;
use sr_core::{BuildSpecTemplate, ResultKey};
use sr_engine::{Orchestrator, Slot, NOT_FOUND};

async fn collect_one(deps: &Deps) -> sr_engine::ResultEntry {
    let names = names();
    let outcome = Orchestrator::new(
        deps.clone(),
        config(1),
        names.clone(),
        BuildSpecTemplate::Default,
    )
    .run(&names.source_location(), &spec_files(1))
    .await
    .unwrap();
    outcome
        .results
        .entry(&ResultKey::new(key("build-1")))
        .unwrap()
}

#[tokio::test]
async fn unreadable_slot_does_not_abort_collection() {
    let deps = deps();
    write_outputs(&deps, "build-1", Some("out"), Some("err"), Some("0"));
    let [_, stderr, _] = names().output_keys(&BuildId::new("build-1"));
    deps.blobs.fail_gets_of(&stderr);

    let entry = collect_one(&deps).await;

    assert_eq!(entry.stdout, Slot::Found("out".to_string()));
    assert_eq!(entry.stderr, Slot::NotFound);
    assert_eq!(entry.exit_status, Slot::Found("0".to_string()));
}

#[tokio::test]
async fn build_that_wrote_nothing_resolves_to_sentinel() {
    let deps = deps();

    let entry = collect_one(&deps).await;

    assert_eq!(entry, sr_engine::ResultEntry::not_found());
    assert_eq!(entry.stdout.to_string(), NOT_FOUND);
}
