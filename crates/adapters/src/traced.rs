// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::blob::{BlobError, BlobStore};
use crate::build::{BuildService, BuildServiceError, ProjectSpec};
use crate::identity::{IdentityError, IdentityService, PolicyRef, RoleRef};
use async_trait::async_trait;
use sr_core::{BuildId, BuildInfo, ProjectName};
use tracing::Instrument;

/// Wrapper that adds tracing to any BuildService
#[derive(Clone)]
pub struct TracedBuildService<B> {
    inner: B,
}

impl<B> TracedBuildService<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: BuildService> BuildService for TracedBuildService<B> {
    async fn create_project(&self, spec: &ProjectSpec) -> Result<(), BuildServiceError> {
        async {
            tracing::info!(image = %spec.image, compute_type = %spec.compute_type, "creating");
            let start = std::time::Instant::now();
            let result = self.inner.create_project(spec).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "project created"),
                Err(e) if e.is_transient_auth() => {
                    tracing::warn!(elapsed_ms, error = %e, "project creation refused")
                }
                Err(e) => tracing::error!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(tracing::info_span!("build.create_project", project = %spec.name))
        .await
    }

    async fn delete_project(&self, name: &ProjectName) -> Result<(), BuildServiceError> {
        let result = self.inner.delete_project(name).await;
        tracing::info_span!("build.delete_project", project = %name).in_scope(|| match &result {
            Ok(()) => tracing::info!("deleted"),
            Err(e) => tracing::warn!(error = %e, "delete failed"),
        });
        result
    }

    async fn start_build(
        &self,
        project: &ProjectName,
        buildspec: &str,
    ) -> Result<BuildId, BuildServiceError> {
        async {
            tracing::debug!(buildspec_len = buildspec.len(), "starting");
            let start = std::time::Instant::now();
            let result = self.inner.start_build(project, buildspec).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(id) => tracing::info!(build_id = %id, elapsed_ms, "build started"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "start failed"),
            }
            result
        }
        .instrument(tracing::info_span!("build.start", project = %project))
        .await
    }

    async fn get_build(&self, id: &BuildId) -> Result<BuildInfo, BuildServiceError> {
        let result = self.inner.get_build(id).await;
        tracing::trace!(build_id = %id, status = ?result.as_ref().ok().map(|b| b.status), "checked");
        result
    }
}

/// Wrapper that adds tracing to any BlobStore
#[derive(Clone)]
pub struct TracedBlobStore<S> {
    inner: S,
}

impl<S> TracedBlobStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: BlobStore> BlobStore for TracedBlobStore<S> {
    async fn create_container(&self, container: &str) -> Result<(), BlobError> {
        let result = self.inner.create_container(container).await;
        tracing::info_span!("blob.create_container", container).in_scope(|| match &result {
            Ok(()) => tracing::info!("created"),
            Err(e) => tracing::error!(error = %e, "create failed"),
        });
        result
    }

    async fn put(&self, container: &str, key: &str, bytes: Vec<u8>) -> Result<(), BlobError> {
        async {
            let size = bytes.len();
            let start = std::time::Instant::now();
            let result = self.inner.put(container, key, bytes).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(size, elapsed_ms, "uploaded"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "upload failed"),
            }
            result
        }
        .instrument(tracing::info_span!("blob.put", container, key))
        .await
    }

    async fn get(&self, container: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        let result = self.inner.get(container, key).await;
        match &result {
            Ok(bytes) => tracing::debug!(container, key, size = bytes.len(), "fetched"),
            Err(e) if e.is_not_found() => tracing::debug!(container, key, "missing"),
            Err(e) => tracing::warn!(container, key, error = %e, "fetch failed"),
        }
        result
    }

    async fn delete_container(&self, container: &str) -> Result<(), BlobError> {
        let result = self.inner.delete_container(container).await;
        tracing::info_span!("blob.delete_container", container).in_scope(|| match &result {
            Ok(()) => tracing::info!("deleted"),
            Err(e) => tracing::warn!(error = %e, "delete failed"),
        });
        result
    }
}

/// Wrapper that adds tracing to any IdentityService
#[derive(Clone)]
pub struct TracedIdentity<I> {
    inner: I,
}

impl<I> TracedIdentity<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<I: IdentityService> IdentityService for TracedIdentity<I> {
    async fn create_role(
        &self,
        name: &str,
        trust_document: &str,
    ) -> Result<RoleRef, IdentityError> {
        let result = self.inner.create_role(name, trust_document).await;
        tracing::info_span!("identity.create_role", name).in_scope(|| match &result {
            Ok(role) => tracing::info!(arn = %role.arn, "role created"),
            Err(e) => tracing::error!(error = %e, "create failed"),
        });
        result
    }

    async fn create_policy(&self, name: &str, document: &str) -> Result<PolicyRef, IdentityError> {
        let result = self.inner.create_policy(name, document).await;
        tracing::info_span!("identity.create_policy", name).in_scope(|| match &result {
            Ok(policy) => tracing::info!(arn = %policy.arn, "policy created"),
            Err(e) => tracing::error!(error = %e, "create failed"),
        });
        result
    }

    async fn attach_policy(
        &self,
        role: &RoleRef,
        policy: &PolicyRef,
    ) -> Result<(), IdentityError> {
        let result = self.inner.attach_policy(role, policy).await;
        if let Err(ref e) = result {
            tracing::error!(role = %role.name, policy = %policy.name, error = %e, "attach failed");
        }
        result
    }

    async fn detach_policy(
        &self,
        role: &RoleRef,
        policy: &PolicyRef,
    ) -> Result<(), IdentityError> {
        let result = self.inner.detach_policy(role, policy).await;
        if let Err(ref e) = result {
            tracing::warn!(role = %role.name, policy = %policy.name, error = %e, "detach failed");
        }
        result
    }

    async fn delete_policy(&self, policy: &PolicyRef) -> Result<(), IdentityError> {
        let result = self.inner.delete_policy(policy).await;
        tracing::info_span!("identity.delete_policy", name = %policy.name).in_scope(
            || match &result {
                Ok(()) => tracing::info!("deleted"),
                Err(e) => tracing::warn!(error = %e, "delete failed"),
            },
        );
        result
    }

    async fn delete_role(&self, role: &RoleRef) -> Result<(), IdentityError> {
        let result = self.inner.delete_role(role).await;
        tracing::info_span!("identity.delete_role", name = %role.name).in_scope(|| match &result {
            Ok(()) => tracing::info!("deleted"),
            Err(e) => tracing::warn!(error = %e, "delete failed"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
