//! Integration tests for the Serene Home storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p serene-home-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart API, persistence across restarts, toasts
//! - `storefront_products` - Catalog listing and product detail
//!
//! The helpers here drive the storefront router in-process with
//! `tower::ServiceExt::oneshot`, so no server or port is needed.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serene_home_storefront::catalog::Catalog;
use serene_home_storefront::config::StorefrontConfig;
use serene_home_storefront::routes;
use serene_home_storefront::state::AppState;
use serene_home_storefront::storage::{FileStore, KeyValueStore, MemoryStore};
use tower::ServiceExt;

/// A storefront wired to an in-memory store.
#[must_use]
pub fn memory_app() -> (Router, AppState) {
    with_storage(Arc::new(MemoryStore::new()))
}

/// A storefront whose cart lives in files under `dir`.
#[must_use]
pub fn file_app(dir: &Path) -> (Router, AppState) {
    with_storage(Arc::new(FileStore::open(dir).unwrap()))
}

/// A storefront over an arbitrary storage backend.
#[must_use]
pub fn with_storage(storage: Arc<dyn KeyValueStore>) -> (Router, AppState) {
    let state = AppState::new(StorefrontConfig::default(), storage, Catalog::serene_home());
    (routes::app(state.clone()), state)
}

/// Issue a GET and decode the JSON body.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Issue a POST with a JSON body and decode the JSON response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}
