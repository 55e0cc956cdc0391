// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed blob store: one directory per container.

use super::{BlobError, BlobStore};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Blob store rooted at a local directory.
///
/// Object keys map to relative paths, so `build-1/project/out.txt` lands
/// in `<root>/<container>/build-1/project/out.txt`.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_path(&self, container: &str) -> Result<PathBuf, BlobError> {
        Ok(self.root.join(checked_relative(container)?))
    }

    fn object_path(&self, container: &str, key: &str) -> Result<PathBuf, BlobError> {
        Ok(self.container_path(container)?.join(checked_relative(key)?))
    }
}

/// Reject keys that would escape the container directory.
fn checked_relative(key: &str) -> Result<&Path, BlobError> {
    let path = Path::new(key);
    let plain = !key.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if plain {
        Ok(path)
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn create_container(&self, container: &str) -> Result<(), BlobError> {
        let path = self.container_path(container)?;
        if tokio::fs::try_exists(&path).await? {
            return Err(BlobError::ContainerExists(container.to_string()));
        }
        tokio::fs::create_dir_all(&path).await?;
        Ok(())
    }

    async fn put(&self, container: &str, key: &str, bytes: Vec<u8>) -> Result<(), BlobError> {
        let path = self.object_path(container, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn get(&self, container: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.object_path(container, key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobError::NotFound {
                container: container.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_container(&self, container: &str) -> Result<(), BlobError> {
        let path = self.container_path(container)?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
