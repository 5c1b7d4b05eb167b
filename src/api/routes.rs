//! API Routes
//!
//! Configures the Axum router with the daemon's endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    acquire_lock, delete_entry, exists_entry, expire_entry, flush_entries, get_entry,
    health_handler, put_entry, release_lock, remove_if_entry, scan_keys, stats_handler,
    ttl_entry, AppState,
};

/// Creates the daemon router.
///
/// # Endpoints
/// - `PUT /entries` - store a value (optional TTL)
/// - `GET /entries/:key` - retrieve a live value
/// - `DELETE /entries/:key` - unconditional delete
/// - `POST /entries/:key/remove-if` - atomic compare-and-delete
/// - `DELETE /entries` - flush the cache namespace
/// - `POST /entries/:key/expire` - move expiry to ttl_ms from now
/// - `GET /entries/:key/exists` - liveness check
/// - `GET /entries/:key/ttl` - remaining whole seconds (-1 absent)
/// - `GET /keys?prefix=` - live logical keys by prefix
/// - `POST /locks/:key` - set-if-absent lock acquire (409 on contention)
/// - `DELETE /locks/:key` - token-matched release
/// - `GET /stats` - hit/miss counters
/// - `GET /health` - health check
///
/// # Middleware
/// - CORS: allows any origin (configurable for production)
/// - Tracing: logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/entries", put(put_entry).delete(flush_entries))
        .route("/entries/:key", get(get_entry).delete(delete_entry))
        .route("/entries/:key/remove-if", post(remove_if_entry))
        .route("/entries/:key/expire", post(expire_entry))
        .route("/entries/:key/exists", get(exists_entry))
        .route("/entries/:key/ttl", get(ttl_entry))
        .route("/keys", get(scan_keys))
        .route("/locks/:key", post(acquire_lock).delete(release_lock))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryStore, DEFAULT_TTL_MS};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::new(MemoryStore::new(DEFAULT_TTL_MS));
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/entries")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"key":"test","value":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/entries/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_lock_acquire_then_conflict() {
        let app = create_test_app();

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/locks/job:1")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"auto_release_secs":5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/locks/job:1")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"auto_release_secs":5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }
}
