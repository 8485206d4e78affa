//! # routes::health

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::SharedState;

/// `GET /api/health`: liveness plus session counters. Never requires a key.
pub async fn health_check(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "ok":       true,
        "status":   "healthy",
        "version":  env!("CARGO_PKG_VERSION"),
        "counters": state.counters(),
    }))
}
