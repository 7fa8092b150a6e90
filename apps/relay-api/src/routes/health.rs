use axum::routing::get;
use axum::{Json, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Process liveness only; says nothing about connections or the cache.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
