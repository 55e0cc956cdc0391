// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sr_adapters::{FakeIdentityService, IdentityCall};

const SOURCE: &str = "shardrun-source-store-9/shardrun_source_9.tar.zst";

fn names() -> RunNames {
    RunNames::new("shardrun", 9)
}

#[test]
fn trust_document_names_build_service() {
    let doc = trust_document();
    let statement = &doc["Statement"][0];
    assert_eq!(statement["Principal"]["Service"], BUILD_SERVICE_PRINCIPAL);
    assert_eq!(statement["Action"], "sts:AssumeRole");
}

#[test]
fn policy_document_scopes_source_and_results() {
    let doc = policy_document(SOURCE, "shardrun-artifact-store-9");
    let statements = doc["Statement"].as_array().unwrap();
    assert_eq!(statements.len(), 3);

    assert_eq!(statements[0]["Resource"], "*");
    assert_eq!(
        statements[1]["Resource"][0],
        format!("arn:aws:s3:::{SOURCE}")
    );
    assert_eq!(
        statements[1]["Action"],
        serde_json::json!(["s3:GetObject", "s3:GetObjectVersion"])
    );
    assert_eq!(
        statements[2]["Resource"][0],
        "arn:aws:s3:::shardrun-artifact-store-9/*"
    );
    assert_eq!(statements[2]["Action"], serde_json::json!(["s3:PutObject"]));
}

#[tokio::test]
async fn create_attaches_policy_to_role() {
    let identity = FakeIdentityService::new();
    let grant = PermissionGrant::create(identity.clone(), &names(), SOURCE)
        .await
        .unwrap();

    assert_eq!(grant.role().name, "shardrun-service-role-9");
    assert!(identity.is_attached("shardrun-service-role-9", "shardrun-service-policy-9"));

    let stored: Value =
        serde_json::from_str(&identity.policy_document("shardrun-service-policy-9").unwrap())
            .unwrap();
    assert_eq!(stored, policy_document(SOURCE, "shardrun-artifact-store-9"));
}

#[tokio::test]
async fn delete_detaches_before_removing() {
    let identity = FakeIdentityService::new();
    let grant = PermissionGrant::create(identity.clone(), &names(), SOURCE)
        .await
        .unwrap();

    grant.delete().await.unwrap();

    assert!(identity.is_empty());
    let tail: Vec<_> = identity.calls().into_iter().skip(3).collect();
    assert_eq!(
        tail,
        vec![
            IdentityCall::DetachPolicy {
                role: "shardrun-service-role-9".to_string(),
                policy: "shardrun-service-policy-9".to_string(),
            },
            IdentityCall::DeletePolicy {
                name: "shardrun-service-policy-9".to_string(),
            },
            IdentityCall::DeleteRole {
                name: "shardrun-service-role-9".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn failed_policy_creation_rolls_back_role() {
    let identity = FakeIdentityService::new();
    // Occupy the policy name so creation collides
    identity
        .create_policy("shardrun-service-policy-9", "{}")
        .await
        .unwrap();

    let err = PermissionGrant::create(identity.clone(), &names(), SOURCE)
        .await
        .err()
        .unwrap();

    assert!(matches!(err, GrantError::Create { resource: "policy", .. }));
    assert!(identity.role_document("shardrun-service-role-9").is_none());
}
