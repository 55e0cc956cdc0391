// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for whole runs against in-memory services.

#![allow(clippy::unwrap_used, clippy::panic)]

use sr_adapters::{FakeBlobStore, FakeBuildService, FakeIdentityService};
use sr_core::{BuildId, FakeClock, RunConfig, RunNames, DEFAULT_PREFIX};
use sr_engine::RunDeps;
use std::fs;
use tempfile::TempDir;

#[path = "runs/outputs.rs"]
mod outputs;
#[path = "runs/retries.rs"]
mod retries;
#[path = "runs/scenarios.rs"]
mod scenarios;

// ---------------------------------------------------------------------------
// Shared test helpers
// ---------------------------------------------------------------------------

type Deps = RunDeps<FakeBuildService, FakeBlobStore, FakeIdentityService>;

/// Epoch seconds of [`FakeClock::new`]
const TIMESTAMP: u64 = 1_483_228_800;

fn deps() -> Deps {
    RunDeps {
        builds: FakeBuildService::new(),
        blobs: FakeBlobStore::new(),
        identity: FakeIdentityService::new(),
    }
}

fn clock() -> FakeClock {
    FakeClock::new()
}

fn names() -> RunNames {
    RunNames::new(DEFAULT_PREFIX, TIMESTAMP)
}

fn config(concurrency: usize) -> RunConfig {
    let mut config = RunConfig::new(
        "ruby:3.3",
        vec!["bundle".into(), "exec".into(), "rspec".into(), "FILES".into()],
    );
    config.concurrency = concurrency;
    config.file_pattern = "spec/*_spec.rb".to_string();
    config.poll_interval_ms = 0;
    config.project_retry_delay_ms = 0;
    config
}

/// Working tree holding `count` spec files, `spec/a_spec.rb` onwards.
fn project(count: usize) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("spec")).unwrap();
    fs::write(dir.path().join("Gemfile"), "source 'https://rubygems.org'\n").unwrap();
    for name in spec_files(count) {
        fs::write(dir.path().join(&name), "RSpec.describe 'x' do; end\n").unwrap();
    }
    dir
}

fn spec_files(count: usize) -> Vec<String> {
    (b'a'..)
        .take(count)
        .map(|c| format!("spec/{}_spec.rb", c as char))
        .collect()
}

/// Objects `build` writes before it finishes; `None` leaves a slot unwritten.
fn write_outputs(
    deps: &Deps,
    build: &str,
    stdout: Option<&str>,
    stderr: Option<&str>,
    exit: Option<&str>,
) {
    let names = names();
    let keys = names.output_keys(&BuildId::new(build));
    for (key, content) in keys.iter().zip([stdout, stderr, exit]) {
        if let Some(content) = content {
            deps.blobs.preload(&names.result_container, key, content);
        }
    }
}

fn key(build: &str) -> String {
    format!("{}:{}", names().project, build)
}
