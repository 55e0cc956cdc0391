// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the remote build, blob and identity services

pub mod blob;
pub mod build;
pub mod identity;
pub mod traced;

pub use blob::{BlobError, BlobStore, LocalBlobStore};
pub use build::{BuildService, BuildServiceError, ProjectSpec};
pub use identity::{IdentityError, IdentityService, PolicyRef, RoleRef};
pub use traced::{TracedBlobStore, TracedBuildService, TracedIdentity};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use blob::{BlobCall, FakeBlobStore};
#[cfg(any(test, feature = "test-support"))]
pub use build::{BuildCall, FakeBuildService, FakeOutcome};
#[cfg(any(test, feature = "test-support"))]
pub use identity::{FakeIdentityService, IdentityCall};
