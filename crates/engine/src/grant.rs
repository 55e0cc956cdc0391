// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Temporary role and policy letting the build service read the source
//! archive and write results.

use crate::error::GrantError;
use serde_json::{json, Value};
use sr_adapters::{IdentityService, PolicyRef, RoleRef};
use sr_core::RunNames;

/// Principal of the remote build service.
pub const BUILD_SERVICE_PRINCIPAL: &str = "codebuild.amazonaws.com";

const POLICY_VERSION: &str = "2012-10-17";

/// Trust document allowing the build service to assume the role.
pub fn trust_document() -> Value {
    json!({
        "Version": POLICY_VERSION,
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": BUILD_SERVICE_PRINCIPAL },
            "Action": "sts:AssumeRole",
        }],
    })
}

/// Policy granting log writes, read on the source archive and write on the
/// result container.
pub fn policy_document(source_location: &str, result_container: &str) -> Value {
    json!({
        "Version": POLICY_VERSION,
        "Statement": [
            {
                "Effect": "Allow",
                "Resource": "*",
                "Action": [
                    "logs:CreateLogGroup",
                    "logs:CreateLogStream",
                    "logs:PutLogEvents",
                ],
            },
            {
                "Effect": "Allow",
                "Resource": [format!("arn:aws:s3:::{source_location}")],
                "Action": ["s3:GetObject", "s3:GetObjectVersion"],
            },
            {
                "Effect": "Allow",
                "Resource": [format!("arn:aws:s3:::{result_container}/*")],
                "Action": ["s3:PutObject"],
            },
        ],
    })
}

/// A live role with its policy attached.
pub struct PermissionGrant<I> {
    identity: I,
    role: RoleRef,
    policy: PolicyRef,
}

impl<I: IdentityService> PermissionGrant<I> {
    /// Create the role and policy for one run and attach them.
    ///
    /// If a later step fails, whatever was already created is removed
    /// before the error is returned.
    pub async fn create(
        identity: I,
        names: &RunNames,
        source_location: &str,
    ) -> Result<Self, GrantError> {
        let role = identity
            .create_role(&names.role, &trust_document().to_string())
            .await
            .map_err(|source| GrantError::Create {
                resource: "role",
                source,
            })?;

        let document = policy_document(source_location, &names.result_container);
        let policy = match identity
            .create_policy(&names.policy, &document.to_string())
            .await
        {
            Ok(policy) => policy,
            Err(source) => {
                discard(identity.delete_role(&role).await, "role");
                return Err(GrantError::Create {
                    resource: "policy",
                    source,
                });
            }
        };

        if let Err(source) = identity.attach_policy(&role, &policy).await {
            discard(identity.delete_policy(&policy).await, "policy");
            discard(identity.delete_role(&role).await, "role");
            return Err(GrantError::Create {
                resource: "policy attachment",
                source,
            });
        }

        tracing::info!(role = %role.name, policy = %policy.name, "created permission grant");
        Ok(Self {
            identity,
            role,
            policy,
        })
    }

    pub fn role(&self) -> &RoleRef {
        &self.role
    }

    /// Detach, then delete the policy, then the role.
    pub async fn delete(self) -> Result<(), GrantError> {
        self.identity
            .detach_policy(&self.role, &self.policy)
            .await
            .map_err(|source| GrantError::Delete {
                resource: "policy attachment",
                source,
            })?;
        self.identity
            .delete_policy(&self.policy)
            .await
            .map_err(|source| GrantError::Delete {
                resource: "policy",
                source,
            })?;
        self.identity
            .delete_role(&self.role)
            .await
            .map_err(|source| GrantError::Delete {
                resource: "role",
                source,
            })?;
        tracing::info!(role = %self.role.name, "deleted permission grant");
        Ok(())
    }
}

fn discard<E: std::fmt::Display>(result: Result<(), E>, resource: &str) {
    if let Err(e) = result {
        tracing::warn!(resource, error = %e, "rollback failed");
    }
}

#[cfg(test)]
#[path = "grant_tests.rs"]
mod tests;
