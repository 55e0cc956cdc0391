// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staging the working tree: target selection, archiving and upload.

use crate::error::SourceError;
use glob::{MatchOptions, Pattern};
use sr_adapters::BlobStore;
use sr_core::RunNames;
use std::path::{Path, PathBuf};

/// Relative paths of the regular files under `root` matching `pattern`, sorted.
///
/// Wildcards do not match a leading dot, so hidden files are only selected
/// when the pattern names them.
pub fn target_files(root: &Path, pattern: &str) -> Result<Vec<String>, SourceError> {
    let pattern_error = |message: String| SourceError::Pattern {
        pattern: pattern.to_string(),
        message,
    };
    let root_str = root
        .to_str()
        .ok_or_else(|| pattern_error(format!("non UTF-8 root {}", root.display())))?;
    let full = format!("{}/{}", Pattern::escape(root_str), pattern);
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&full, options).map_err(|e| pattern_error(e.msg.to_string()))? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable path");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if let Some(relative) = path.strip_prefix(root).ok().and_then(Path::to_str) {
            files.push(relative.to_string());
        }
    }
    files.sort();
    Ok(files)
}

/// Pack every file under `root` into a zstd-compressed tar stream.
pub fn archive(root: &Path) -> Result<Vec<u8>, SourceError> {
    let encoder = zstd::stream::Encoder::new(Vec::new(), 0)?;
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);
    builder.append_dir_all(".", root)?;
    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

/// The uploaded source of one run.
pub struct Source<S> {
    blobs: S,
    container: String,
    archive: String,
    targets: Vec<String>,
}

impl<S: BlobStore> Source<S> {
    /// Select targets, then archive `root` and upload it to a fresh container.
    ///
    /// Target selection runs first so an empty selection fails before
    /// anything remote exists.
    pub async fn stage(
        blobs: S,
        root: &Path,
        pattern: &str,
        names: &RunNames,
    ) -> Result<Self, SourceError> {
        let targets = target_files(root, pattern)?;
        if targets.is_empty() {
            return Err(SourceError::NoTargets(pattern.to_string()));
        }

        let dir: PathBuf = root.to_path_buf();
        let bytes = tokio::task::spawn_blocking(move || archive(&dir))
            .await
            .map_err(|e| SourceError::Task(e.to_string()))??;

        blobs.create_container(&names.source_container).await?;
        let size = bytes.len();
        blobs
            .put(&names.source_container, &names.source_archive, bytes)
            .await?;
        tracing::info!(
            location = %names.source_location(),
            size,
            files = targets.len(),
            "uploaded source"
        );

        Ok(Self {
            blobs,
            container: names.source_container.clone(),
            archive: names.source_archive.clone(),
            targets,
        })
    }

    pub fn target_files(&self) -> &[String] {
        &self.targets
    }

    /// `container/archive`, as read by the builds.
    pub fn location(&self) -> String {
        format!("{}/{}", self.container, self.archive)
    }

    /// Delete the source container.
    pub async fn delete(&self) -> Result<(), SourceError> {
        self.blobs.delete_container(&self.container).await?;
        tracing::info!(container = %self.container, "deleted source");
        Ok(())
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
