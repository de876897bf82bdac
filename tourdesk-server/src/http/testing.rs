//! Router test helpers

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use super::server::{build_router, AppState};
use crate::catalog::Catalog;
use crate::db::{Audit, MemoryGateway};

/// Router over an empty in-memory gateway.
pub fn test_app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryGateway::new()),
        Catalog::default(),
        Audit::default(),
    );
    build_router(state, false)
}

/// Send one request; an empty response body reads as `null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let body = body.map(|b| b.to_string());
    request(app, method, uri, body).await
}

/// Send a raw, possibly malformed, JSON body.
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, JsonValue) {
    request(app, method, uri, Some(body.to_string())).await
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
