//! Integration Tests for the Remote Engine
//!
//! Drives a `RemoteStore` against a real `lockcached` instance spawned on an
//! ephemeral port. Separate `RemoteStore` clients stand in for separate
//! processes sharing one backing store.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use lockcache::api::{create_router, AppState};
use lockcache::config::Config;
use lockcache::engine::{CacheEngine, EngineKind, MemoryStore, RemoteStore, DEFAULT_TTL_MS};
use lockcache::registry::CacheRegistry;
use lockcache::tasks::spawn_reaper;

// == Helper Functions ==

/// Spawns a daemon with a fast reaper and returns its base URL.
async fn spawn_daemon() -> String {
    let state = AppState::new(MemoryStore::new(DEFAULT_TTL_MS));
    spawn_reaper(state.store.clone(), 200);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> RemoteStore {
    RemoteStore::new(base_url, 2000).unwrap()
}

// == Value Contract Tests ==

#[tokio::test]
async fn test_put_get_and_expire() {
    let url = spawn_daemon().await;
    let store = client(&url);

    store.put("a", json!(42), Some(1000)).await;
    assert_eq!(store.get("a").await, Some(json!(42)));

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(store.get("a").await, None);
}

#[tokio::test]
async fn test_null_value_not_cached() {
    let url = spawn_daemon().await;
    let store = client(&url);

    store.put("null_key", json!(null), None).await;

    assert!(!store.check_exists("null_key").await);
}

#[tokio::test]
async fn test_overwrite_visible_to_other_client() {
    let url = spawn_daemon().await;
    let writer = client(&url);
    let reader = client(&url);

    writer.put("shared", json!("v1"), None).await;
    writer.put("shared", json!("v2"), None).await;

    assert_eq!(reader.get("shared").await, Some(json!("v2")));
}

#[tokio::test]
async fn test_url_special_keys_round_trip() {
    // Keys are opaque UTF-8; slashes, query and fragment bytes must survive
    // the path-segment encoding on the wire
    let url = spawn_daemon().await;
    let store = client(&url);

    for key in ["dir/file", "a b", "q?x=1", "frag#1", "sub/dir/leaf"] {
        store.put(key, json!("v"), None).await;
        assert_eq!(store.get(key).await, Some(json!("v")), "key {key:?}");
        assert!(store.check_exists(key).await, "key {key:?}");

        store.remove(key).await;
        assert_eq!(store.get(key).await, None, "key {key:?}");
    }

    let token = store.acquire("jobs/reindex", 30).await.unwrap();
    assert!(store.acquire("jobs/reindex", 30).await.is_none());
    assert!(store.release("jobs/reindex", &token).await);
}

#[tokio::test]
async fn test_remove_if_requires_match() {
    let url = spawn_daemon().await;
    let store = client(&url);

    store.put("x", json!("v1"), None).await;

    assert!(!store.remove_if("x", &json!("v2")).await);
    assert_eq!(store.get("x").await, Some(json!("v1")));

    assert!(store.remove_if("x", &json!("v1")).await);
    assert_eq!(store.get("x").await, None);
}

#[tokio::test]
async fn test_scan_prefix() {
    let url = spawn_daemon().await;
    let store = client(&url);

    store.put("ns:a", json!(1), None).await;
    store.put("ns:b", json!(2), None).await;
    store.put("other:c", json!(3), None).await;

    let mut keys = store.scan_prefix("ns:").await;
    keys.sort();
    assert_eq!(keys, vec!["ns:a", "ns:b"]);
}

#[tokio::test]
async fn test_update_expiration_extends_remaining_life() {
    let url = spawn_daemon().await;
    let store = client(&url);

    store.put("key1", json!("v"), Some(2000)).await;
    store.update_expiration("key1", 60_000).await;

    let remaining = store.expire_seconds("key1").await;
    assert!(remaining >= 58 && remaining <= 60);
}

#[tokio::test]
async fn test_expire_seconds_absent() {
    let url = spawn_daemon().await;
    let store = client(&url);

    assert_eq!(store.expire_seconds("missing").await, -1);
}

#[tokio::test]
async fn test_remove_all_flushes_cache_namespace_only() {
    let url = spawn_daemon().await;
    let store = client(&url);

    store.put("key1", json!(1), None).await;
    let token = store.acquire("job:1", 60).await.unwrap();

    store.remove_all().await;

    assert_eq!(store.get("key1").await, None);
    // Lock record survives the flush
    assert!(store.acquire("job:1", 60).await.is_none());
    assert!(store.release("job:1", &token).await);
}

// == Lock Protocol Tests ==

#[tokio::test]
async fn test_lock_contention_across_clients() {
    let url = spawn_daemon().await;
    let holder = client(&url);
    let contender = client(&url);

    let token = holder.acquire("job:1", 5).await.unwrap();

    assert!(contender.acquire("job:1", 5).await.is_none());

    assert!(holder.release("job:1", &token).await);
    assert!(contender.acquire("job:1", 5).await.is_some());
}

#[tokio::test]
async fn test_lock_auto_release_after_crash() {
    let url = spawn_daemon().await;

    // Holder "crashes": client dropped without releasing
    {
        let holder = client(&url);
        holder.acquire("job:2", 1).await.unwrap();
    }

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let successor = client(&url);
    assert!(successor.acquire("job:2", 1).await.is_some());
}

#[tokio::test]
async fn test_foreign_token_cannot_release() {
    let url = spawn_daemon().await;
    let holder = client(&url);
    let attacker = client(&url);

    let token = holder.acquire("job:3", 60).await.unwrap();

    assert!(!attacker.release("job:3", "guessed-token").await);
    assert!(attacker.acquire("job:3", 60).await.is_none());

    assert!(holder.release("job:3", &token).await);
}

#[tokio::test]
async fn test_concurrent_acquire_single_winner_across_clients() {
    let url = spawn_daemon().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = client(&url);
        handles.push(tokio::spawn(async move {
            store.acquire("contended", 60).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1, "exactly one client may win the lock");
}

#[tokio::test]
async fn test_lock_handle_through_remote_engine() {
    let url = spawn_daemon().await;
    let engine = CacheEngine::Remote(client(&url));

    let handle = engine.lock("job:4", 5).await.expect("first lock succeeds");
    assert!(engine.lock("job:4", 5).await.is_none());

    handle.release().await;
    // Idempotent
    handle.release().await;

    let next = engine.lock("job:4", 5).await.expect("key free after release");
    next.release().await;
}

// == Registry Wiring ==

#[tokio::test]
async fn test_registry_binds_remote_engine() {
    let url = spawn_daemon().await;
    let config = Config {
        remote_url: Some(url),
        ..Config::default()
    };
    let registry = CacheRegistry::new(config);

    let engine = registry.engine(EngineKind::Remote).unwrap();
    engine.put("wired", json!(true), None).await;
    assert_eq!(engine.get("wired").await, Some(json!(true)));

    // Same singleton on the second lookup
    let again = registry.engine(EngineKind::Remote).unwrap();
    assert!(Arc::ptr_eq(&engine, &again));
}
