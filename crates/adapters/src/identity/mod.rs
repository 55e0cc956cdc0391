// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity and permission service adapters

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeIdentityService, IdentityCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from identity operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("delete conflict: {0}")]
    DeleteConflict(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// A created role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRef {
    pub name: String,
    pub arn: String,
}

/// A created policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRef {
    pub name: String,
    pub arn: String,
}

/// Adapter for the cloud identity service
#[async_trait]
pub trait IdentityService: Clone + Send + Sync + 'static {
    /// Create a role the given principal may assume
    async fn create_role(&self, name: &str, trust_document: &str)
        -> Result<RoleRef, IdentityError>;

    /// Create a standalone policy
    async fn create_policy(&self, name: &str, document: &str) -> Result<PolicyRef, IdentityError>;

    async fn attach_policy(&self, role: &RoleRef, policy: &PolicyRef)
        -> Result<(), IdentityError>;

    async fn detach_policy(&self, role: &RoleRef, policy: &PolicyRef)
        -> Result<(), IdentityError>;

    /// Delete a policy; fails with [`IdentityError::DeleteConflict`] while attached
    async fn delete_policy(&self, policy: &PolicyRef) -> Result<(), IdentityError>;

    /// Delete a role; fails with [`IdentityError::DeleteConflict`] while policies are attached
    async fn delete_role(&self, role: &RoleRef) -> Result<(), IdentityError>;
}
