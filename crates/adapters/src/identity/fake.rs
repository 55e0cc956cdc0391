// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake identity service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{IdentityError, IdentityService, PolicyRef, RoleRef};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Recorded identity call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
    CreateRole { name: String },
    CreatePolicy { name: String },
    AttachPolicy { role: String, policy: String },
    DetachPolicy { role: String, policy: String },
    DeletePolicy { name: String },
    DeleteRole { name: String },
}

struct FakeIdentityState {
    roles: HashMap<String, String>,
    policies: HashMap<String, String>,
    attachments: HashSet<(String, String)>,
    calls: Vec<IdentityCall>,
}

/// Fake identity service for testing
///
/// Enforces the usual ordering rule: a policy or role cannot be deleted
/// while the policy is still attached.
#[derive(Clone)]
pub struct FakeIdentityService {
    inner: Arc<Mutex<FakeIdentityState>>,
}

impl Default for FakeIdentityService {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeIdentityState {
                roles: HashMap::new(),
                policies: HashMap::new(),
                attachments: HashSet::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust document of a live role
    pub fn role_document(&self, name: &str) -> Option<String> {
        self.inner.lock().roles.get(name).cloned()
    }

    /// Document of a live policy
    pub fn policy_document(&self, name: &str) -> Option<String> {
        self.inner.lock().policies.get(name).cloned()
    }

    pub fn is_attached(&self, role: &str, policy: &str) -> bool {
        self.inner
            .lock()
            .attachments
            .contains(&(role.to_string(), policy.to_string()))
    }

    /// True when no role or policy is left behind
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.lock();
        inner.roles.is_empty() && inner.policies.is_empty()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<IdentityCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl IdentityService for FakeIdentityService {
    async fn create_role(
        &self,
        name: &str,
        trust_document: &str,
    ) -> Result<RoleRef, IdentityError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IdentityCall::CreateRole {
            name: name.to_string(),
        });
        if inner.roles.contains_key(name) {
            return Err(IdentityError::AlreadyExists(name.to_string()));
        }
        inner
            .roles
            .insert(name.to_string(), trust_document.to_string());
        Ok(RoleRef {
            name: name.to_string(),
            arn: format!("arn:fake:iam::role/{name}"),
        })
    }

    async fn create_policy(&self, name: &str, document: &str) -> Result<PolicyRef, IdentityError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IdentityCall::CreatePolicy {
            name: name.to_string(),
        });
        if inner.policies.contains_key(name) {
            return Err(IdentityError::AlreadyExists(name.to_string()));
        }
        inner
            .policies
            .insert(name.to_string(), document.to_string());
        Ok(PolicyRef {
            name: name.to_string(),
            arn: format!("arn:fake:iam::policy/{name}"),
        })
    }

    async fn attach_policy(
        &self,
        role: &RoleRef,
        policy: &PolicyRef,
    ) -> Result<(), IdentityError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IdentityCall::AttachPolicy {
            role: role.name.clone(),
            policy: policy.name.clone(),
        });
        if !inner.roles.contains_key(&role.name) {
            return Err(IdentityError::NotFound(role.name.clone()));
        }
        if !inner.policies.contains_key(&policy.name) {
            return Err(IdentityError::NotFound(policy.name.clone()));
        }
        inner
            .attachments
            .insert((role.name.clone(), policy.name.clone()));
        Ok(())
    }

    async fn detach_policy(
        &self,
        role: &RoleRef,
        policy: &PolicyRef,
    ) -> Result<(), IdentityError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IdentityCall::DetachPolicy {
            role: role.name.clone(),
            policy: policy.name.clone(),
        });
        if inner
            .attachments
            .remove(&(role.name.clone(), policy.name.clone()))
        {
            Ok(())
        } else {
            Err(IdentityError::NotFound(format!(
                "{} on {}",
                policy.name, role.name
            )))
        }
    }

    async fn delete_policy(&self, policy: &PolicyRef) -> Result<(), IdentityError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IdentityCall::DeletePolicy {
            name: policy.name.clone(),
        });
        if inner.attachments.iter().any(|(_, p)| p == &policy.name) {
            return Err(IdentityError::DeleteConflict(policy.name.clone()));
        }
        inner
            .policies
            .remove(&policy.name)
            .map(|_| ())
            .ok_or_else(|| IdentityError::NotFound(policy.name.clone()))
    }

    async fn delete_role(&self, role: &RoleRef) -> Result<(), IdentityError> {
        let mut inner = self.inner.lock();
        inner.calls.push(IdentityCall::DeleteRole {
            name: role.name.clone(),
        });
        if inner.attachments.iter().any(|(r, _)| r == &role.name) {
            return Err(IdentityError::DeleteConflict(role.name.clone()));
        }
        inner
            .roles
            .remove(&role.name)
            .map(|_| ())
            .ok_or_else(|| IdentityError::NotFound(role.name.clone()))
    }
}
