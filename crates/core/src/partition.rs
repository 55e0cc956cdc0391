// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Splitting the target file list into one slice per build unit.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("no target files to partition")]
    Empty,
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Split `items` into contiguous chunks of `ceil(len / concurrency)`.
///
/// Order is preserved within and across chunks. The last chunk holds the
/// remainder, so fewer than `concurrency` chunks come back when the items
/// don't divide evenly or when there are fewer items than requested shards.
pub fn partition<T: Clone>(items: &[T], concurrency: usize) -> Result<Vec<Vec<T>>, PartitionError> {
    if concurrency == 0 {
        return Err(PartitionError::ZeroConcurrency);
    }
    if items.is_empty() {
        return Err(PartitionError::Empty);
    }
    let size = items.len().div_ceil(concurrency);
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;
