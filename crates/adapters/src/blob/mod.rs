// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blob object store adapters

mod local;

pub use local::LocalBlobStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BlobCall, FakeBlobStore};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from blob store operations
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("object not found: {container}/{key}")]
    NotFound { container: String, key: String },
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("container already exists: {0}")]
    ContainerExists(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Request(String),
}

impl BlobError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlobError::NotFound { .. })
    }
}

/// Adapter for a container-scoped object store
#[async_trait]
pub trait BlobStore: Clone + Send + Sync + 'static {
    /// Create an empty container
    async fn create_container(&self, container: &str) -> Result<(), BlobError>;

    /// Write an object, replacing any previous content
    async fn put(&self, container: &str, key: &str, bytes: Vec<u8>) -> Result<(), BlobError>;

    /// Read an object; a missing object is [`BlobError::NotFound`]
    async fn get(&self, container: &str, key: &str) -> Result<Vec<u8>, BlobError>;

    /// Delete a container and every object in it.
    ///
    /// Deleting an empty or absent container succeeds.
    async fn delete_container(&self, container: &str) -> Result<(), BlobError>;
}
