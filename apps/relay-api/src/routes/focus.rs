use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/latest_focus", get(latest_focus))
}

/// Polling read of the most recent sample. Both fields are `null` until the
/// first valid sample arrives, never an error.
async fn latest_focus(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.cache.get() {
        Some(sample) => Json(serde_json::json!({ "score": sample.score, "ts": sample.ts })),
        None => Json(serde_json::json!({ "score": null, "ts": null })),
    }
}
