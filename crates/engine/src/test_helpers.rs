// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine unit tests

use crate::orchestrator::{Orchestrator, RunDeps};
use sr_adapters::{FakeBlobStore, FakeBuildService, FakeIdentityService};
use sr_core::{BuildSpecTemplate, RunConfig, RunNames};

pub(crate) type FakeDeps = RunDeps<FakeBuildService, FakeBlobStore, FakeIdentityService>;

pub(crate) const SOURCE: &str = "shardrun-source-store-5/shardrun_source_5.tar.zst";

pub(crate) fn fake_deps() -> FakeDeps {
    RunDeps {
        builds: FakeBuildService::new(),
        blobs: FakeBlobStore::new(),
        identity: FakeIdentityService::new(),
    }
}

/// Config that never sleeps.
pub(crate) fn fast_config(concurrency: usize) -> RunConfig {
    let mut config = RunConfig::new("ruby:3.3", vec!["rspec".to_string(), "FILES".to_string()]);
    config.concurrency = concurrency;
    config.poll_interval_ms = 0;
    config.project_retry_delay_ms = 0;
    config
}

pub(crate) fn names() -> RunNames {
    RunNames::new("shardrun", 5)
}

pub(crate) fn orchestrator(
    deps: &FakeDeps,
    config: RunConfig,
) -> Orchestrator<FakeBuildService, FakeBlobStore, FakeIdentityService> {
    Orchestrator::new(deps.clone(), config, names(), BuildSpecTemplate::Default)
}

pub(crate) fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// A writer that captures log output for testing
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs {
    logs: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }

    /// Install a subscriber writing into this buffer for the current thread.
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
