//! # routes
//!
//! HTTP surface of the schema layer.
//!
//! ```text
//!  POST /api/strategy/validate   JSON  ─▶ full report (errors, warnings, suggestions)
//!  POST /api/strategy/sanitize   JSON  ─▶ repaired strategy + dropped conditions
//!  POST /api/strategy/parse      text  ─▶ validate, sanitize if valid      (422 if not)
//!  POST /api/strategy/autofix    text  ─▶ validate, repair if invalid      (422 if unfixable)
//!  GET  /api/indicators                ─▶ indicator / operator / timeframe vocabulary
//!  GET  /api/health                    ─▶ liveness + counters (no API key)
//! ```

pub mod health;
pub mod strategy;
pub mod view;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::{auth::require_api_key, config::ServerConfig, state::SharedState};

/// Every route plus auth and the body limit. Tracing and CORS are added by
/// the binary.
pub fn router(state: SharedState, config: &ServerConfig) -> Router {
    Router::new()
        // ── Schema ───────────────────────────────────────────────────────────
        .route("/api/strategy/validate", post(strategy::validate))
        .route("/api/strategy/sanitize", post(strategy::sanitize))
        .route("/api/strategy/parse",    post(strategy::parse_strategy))
        .route("/api/strategy/autofix",  post(strategy::autofix))
        .route("/api/indicators",        get(strategy::catalogue))
        // ── Ops ──────────────────────────────────────────────────────────────
        .route("/api/health",            get(health::health_check))
        // ── Middleware ───────────────────────────────────────────────────────
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}
