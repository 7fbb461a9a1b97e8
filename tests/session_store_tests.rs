//! Session store integration tests
//!
//! These run against a live Redis on the default address from
//! `RedisConfig::default()`.

use std::collections::HashMap;
use std::time::Duration;

use libris_server::auth::{AuthError, SessionStore, TokenKind};
use libris_server::config::RedisConfig;

const TTL: Duration = Duration::from_secs(60);

fn store() -> SessionStore {
    SessionStore::new(&RedisConfig::default(), "libris-test").expect("Failed to build store")
}

/// Unique-ish subject id per test run so re-runs never collide
fn fresh_uid(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", tag, nanos)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_put_then_check_matches() {
    let store = store();
    let uid = fresh_uid("check");

    store
        .put(&uid, TokenKind::Access, 0, "raw-token", HashMap::new(), TTL)
        .await
        .expect("Failed to write session record");

    let (matched, record) = store
        .check(&uid, "raw-token", TokenKind::Access, 0)
        .await
        .expect("Failed to check session record");
    assert!(matched);
    assert_eq!(record.org_id, 0);

    store.delete(&uid, TokenKind::Access).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_check_mismatch_is_negative_not_an_error() {
    let store = store();
    let uid = fresh_uid("mismatch");

    store
        .put(&uid, TokenKind::Access, 0, "raw-token", HashMap::new(), TTL)
        .await
        .expect("Failed to write session record");

    // Tampered token
    let (matched, _) = store
        .check(&uid, "tampered-token", TokenKind::Access, 0)
        .await
        .expect("Mismatch must not be an error");
    assert!(!matched);

    // Wrong org id
    let (matched, _) = store
        .check(&uid, "raw-token", TokenKind::Access, 7)
        .await
        .expect("Mismatch must not be an error");
    assert!(!matched);

    store.delete(&uid, TokenKind::Access).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_second_put_supersedes_first() {
    let store = store();
    let uid = fresh_uid("supersede");

    store
        .put(&uid, TokenKind::Access, 0, "first-token", HashMap::new(), TTL)
        .await
        .expect("Failed to write first record");
    store
        .put(&uid, TokenKind::Access, 0, "second-token", HashMap::new(), TTL)
        .await
        .expect("Failed to write second record");

    let (matched, _) = store
        .check(&uid, "first-token", TokenKind::Access, 0)
        .await
        .expect("Failed to check first token");
    assert!(!matched);

    let (matched, _) = store
        .check(&uid, "second-token", TokenKind::Access, 0)
        .await
        .expect("Failed to check second token");
    assert!(matched);

    store.delete(&uid, TokenKind::Access).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_token_kinds_are_separate_namespaces() {
    let store = store();
    let uid = fresh_uid("kinds");

    store
        .put(&uid, TokenKind::Access, 0, "access-token", HashMap::new(), TTL)
        .await
        .expect("Failed to write session record");

    // Nothing was issued under the refresh namespace
    assert!(matches!(
        store.get(&uid, TokenKind::Refresh).await,
        Err(AuthError::NotFound)
    ));

    store.delete(&uid, TokenKind::Access).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_delete_removes_record() {
    let store = store();
    let uid = fresh_uid("delete");

    store
        .put(&uid, TokenKind::Access, 0, "raw-token", HashMap::new(), TTL)
        .await
        .expect("Failed to write session record");

    assert!(store.delete(&uid, TokenKind::Access).await.unwrap());
    assert!(matches!(
        store.get(&uid, TokenKind::Access).await,
        Err(AuthError::NotFound)
    ));

    // A second delete finds nothing
    assert!(!store.delete(&uid, TokenKind::Access).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_extra_fields_survive_the_round_trip() {
    let store = store();
    let uid = fresh_uid("extra");

    let extra = HashMap::from([
        ("phone".to_string(), serde_json::json!("13800000000")),
        ("is_admin".to_string(), serde_json::json!(true)),
    ]);
    store
        .put(&uid, TokenKind::Access, 3, "raw-token", extra, TTL)
        .await
        .expect("Failed to write session record");

    let record = store
        .get(&uid, TokenKind::Access)
        .await
        .expect("Failed to read session record");
    assert_eq!(record.org_id, 3);
    assert_eq!(record.extra["phone"], serde_json::json!("13800000000"));
    assert_eq!(record.extra["is_admin"], serde_json::json!(true));

    store.delete(&uid, TokenKind::Access).await.unwrap();
}
