// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result store: registry of build keys and the outputs fetched for them.

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use sr_adapters::{BlobError, BlobStore};
use sr_core::{OutputNames, ResultKey};
use std::fmt;

/// Sentinel rendered for an output object that could not be fetched.
pub const NOT_FOUND: &str = "ARTIFACT_NOT_FOUND";

/// One output stream of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Found(String),
    NotFound,
}

impl Slot {
    pub fn as_found(&self) -> Option<&str> {
        match self {
            Slot::Found(text) => Some(text),
            Slot::NotFound => None,
        }
    }
}

impl Serialize for Slot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_found().unwrap_or(NOT_FOUND))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_found().unwrap_or(NOT_FOUND))
    }
}

/// The three outputs of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub stdout: Slot,
    pub stderr: Slot,
    pub exit_status: Slot,
}

impl ResultEntry {
    pub fn not_found() -> Self {
        Self {
            stdout: Slot::NotFound,
            stderr: Slot::NotFound,
            exit_status: Slot::NotFound,
        }
    }
}

/// Keyed store of per-build outputs, backed by one blob container.
///
/// Keys are `project:build`. The registry is ordered by registration and
/// every mutation happens under one lock, so a retried build's key swap is
/// never observed half-done.
pub struct ResultStore<S> {
    blobs: S,
    container: String,
    outputs: OutputNames,
    keys: Mutex<Vec<ResultKey>>,
    entries: Mutex<IndexMap<ResultKey, ResultEntry>>,
}

impl<S: BlobStore> ResultStore<S> {
    /// Create the backing container.
    pub async fn create(
        blobs: S,
        container: impl Into<String>,
        outputs: OutputNames,
    ) -> Result<Self, BlobError> {
        let container = container.into();
        blobs.create_container(&container).await?;
        tracing::info!(%container, "created result store");
        Ok(Self {
            blobs,
            container,
            outputs,
            keys: Mutex::new(Vec::new()),
            entries: Mutex::new(IndexMap::new()),
        })
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Append a key. Returns false if it is already registered.
    pub fn register(&self, key: ResultKey) -> bool {
        let mut keys = self.keys.lock();
        if keys.contains(&key) {
            return false;
        }
        tracing::debug!(%key, container = %self.container, "registered build");
        keys.push(key);
        true
    }

    /// Retire `old` and append `new` in one step.
    pub fn replace(&self, old: &ResultKey, new: ResultKey) {
        let mut keys = self.keys.lock();
        match keys.iter().position(|key| key == old) {
            Some(index) => {
                keys.remove(index);
            }
            None => tracing::warn!(%old, "replacing a key that was never registered"),
        }
        tracing::debug!(%old, %new, "replaced build");
        if !keys.contains(&new) {
            keys.push(new);
        }
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> Vec<ResultKey> {
        self.keys.lock().clone()
    }

    /// Fetch the three outputs of every registered key.
    ///
    /// Any object that cannot be fetched resolves to [`Slot::NotFound`];
    /// collection never fails as a whole.
    pub async fn collect(&self) -> IndexMap<ResultKey, ResultEntry> {
        let keys = self.keys();
        let mut collected = IndexMap::with_capacity(keys.len());
        for key in keys {
            let entry = match key.split() {
                Some((project, build)) => ResultEntry {
                    stdout: self.fetch(project, build, &self.outputs.stdout).await,
                    stderr: self.fetch(project, build, &self.outputs.stderr).await,
                    exit_status: self.fetch(project, build, &self.outputs.exit_status).await,
                },
                None => {
                    tracing::warn!(%key, "malformed result key");
                    ResultEntry::not_found()
                }
            };
            collected.insert(key, entry);
        }
        *self.entries.lock() = collected.clone();
        collected
    }

    /// Entries materialized by the last [`collect`](Self::collect).
    pub fn entries(&self) -> IndexMap<ResultKey, ResultEntry> {
        self.entries.lock().clone()
    }

    pub fn entry(&self, key: &ResultKey) -> Option<ResultEntry> {
        self.entries.lock().get(key).cloned()
    }

    /// Delete the backing container and everything in it.
    pub async fn teardown(&self) -> Result<(), BlobError> {
        self.blobs.delete_container(&self.container).await?;
        tracing::info!(container = %self.container, "deleted result store");
        Ok(())
    }

    async fn fetch(&self, project: &str, build: &str, basename: &str) -> Slot {
        let object = OutputNames::object_key(project, build, basename);
        match self.blobs.get(&self.container, &object).await {
            Ok(bytes) => Slot::Found(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%object, "artifact not found");
                Slot::NotFound
            }
            Err(e) => {
                tracing::warn!(%object, error = %e, "failed to fetch artifact");
                Slot::NotFound
            }
        }
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
