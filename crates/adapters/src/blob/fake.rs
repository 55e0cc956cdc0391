// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory blob store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BlobError, BlobStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Recorded blob store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobCall {
    CreateContainer { container: String },
    Put { container: String, key: String },
    Get { container: String, key: String },
    DeleteContainer { container: String },
}

struct FakeBlobState {
    containers: HashMap<String, BTreeMap<String, Vec<u8>>>,
    /// Objects that appear when their container is created
    preloaded: HashMap<String, BTreeMap<String, Vec<u8>>>,
    failing_gets: HashSet<String>,
    calls: Vec<BlobCall>,
}

/// In-memory blob store for testing
#[derive(Clone)]
pub struct FakeBlobStore {
    inner: Arc<Mutex<FakeBlobState>>,
}

impl Default for FakeBlobStore {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeBlobState {
                containers: HashMap::new(),
                preloaded: HashMap::new(),
                failing_gets: HashSet::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a call (creates the container).
    pub fn insert(&self, container: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        self.inner
            .lock()
            .containers
            .entry(container.to_string())
            .or_default()
            .insert(key.to_string(), bytes.into());
    }

    /// Seed an object that shows up once `container` is created, the way
    /// remote builds write into a container the run creates.
    pub fn preload(&self, container: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        self.inner
            .lock()
            .preloaded
            .entry(container.to_string())
            .or_default()
            .insert(key.to_string(), bytes.into());
    }

    /// Make every `get` of `key` fail with a request error.
    pub fn fail_gets_of(&self, key: &str) {
        self.inner.lock().failing_gets.insert(key.to_string());
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.inner.lock().containers.contains_key(container)
    }

    pub fn object(&self, container: &str, key: &str) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .containers
            .get(container)
            .and_then(|objects| objects.get(key))
            .cloned()
    }

    /// Keys stored in a container, sorted
    pub fn keys(&self, container: &str) -> Vec<String> {
        self.inner
            .lock()
            .containers
            .get(container)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BlobCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn create_container(&self, container: &str) -> Result<(), BlobError> {
        let mut inner = self.inner.lock();
        inner.calls.push(BlobCall::CreateContainer {
            container: container.to_string(),
        });
        if inner.containers.contains_key(container) {
            return Err(BlobError::ContainerExists(container.to_string()));
        }
        let objects = inner.preloaded.remove(container).unwrap_or_default();
        inner.containers.insert(container.to_string(), objects);
        Ok(())
    }

    async fn put(&self, container: &str, key: &str, bytes: Vec<u8>) -> Result<(), BlobError> {
        let mut inner = self.inner.lock();
        inner.calls.push(BlobCall::Put {
            container: container.to_string(),
            key: key.to_string(),
        });
        let objects = inner
            .containers
            .get_mut(container)
            .ok_or_else(|| BlobError::Request(format!("no such container: {container}")))?;
        objects.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, container: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        let mut inner = self.inner.lock();
        inner.calls.push(BlobCall::Get {
            container: container.to_string(),
            key: key.to_string(),
        });
        if inner.failing_gets.contains(key) {
            return Err(BlobError::Request(format!("injected failure: {key}")));
        }
        inner
            .containers
            .get(container)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| BlobError::NotFound {
                container: container.to_string(),
                key: key.to_string(),
            })
    }

    async fn delete_container(&self, container: &str) -> Result<(), BlobError> {
        let mut inner = self.inner.lock();
        inner.calls.push(BlobCall::DeleteContainer {
            container: container.to_string(),
        });
        inner.containers.remove(container);
        Ok(())
    }
}
