// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn put_then_get_nested_key() {
    let dir = tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path());
    store.create_container("results").await.unwrap();

    store
        .put("results", "build-1/proj/stdout.txt", b"hello".to_vec())
        .await
        .unwrap();

    let bytes = store.get("results", "build-1/proj/stdout.txt").await.unwrap();
    assert_eq!(bytes, b"hello");
    assert!(dir.path().join("results/build-1/proj/stdout.txt").is_file());
}

#[tokio::test]
async fn missing_object_is_not_found() {
    let dir = tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path());
    store.create_container("results").await.unwrap();

    let err = store.get("results", "nope.txt").await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn duplicate_container_is_rejected() {
    let dir = tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path());
    store.create_container("results").await.unwrap();

    let err = store.create_container("results").await.unwrap_err();
    assert!(matches!(err, BlobError::ContainerExists(_)));
}

#[tokio::test]
async fn delete_container_removes_objects_and_tolerates_absence() {
    let dir = tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path());
    store.create_container("results").await.unwrap();
    store.put("results", "a/b.txt", b"x".to_vec()).await.unwrap();

    store.delete_container("results").await.unwrap();
    assert!(!dir.path().join("results").exists());

    store.delete_container("results").await.unwrap();
    store.delete_container("never-created").await.unwrap();
}

#[yare::parameterized(
    parent_dir = { "../escape.txt" },
    absolute   = { "/etc/passwd" },
    dot        = { "./a.txt" },
    empty      = { "" },
)]
fn escaping_keys_are_rejected(key: &str) {
    assert!(matches!(
        checked_relative(key),
        Err(BlobError::InvalidKey(_))
    ));
}
