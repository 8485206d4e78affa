//! # auth: API Key Middleware
//!
//! Guards the strategy endpoints with an `X-API-Key` header.
//!
//! ## Mode
//! - `API_KEY` unset (or empty) → **Allow All** (dev mode)
//! - `API_KEY` set → every request must send `X-API-Key: <key>`
//!
//! ## Exempt
//! `GET /api/health` never requires a key.
//!
//! ## Usage
//! ```bash
//! API_KEY=super-secret-key-here cargo run
//! ```
//! ```bash
//! curl -H "X-API-Key: super-secret-key-here" \
//!      -d @strategy.json http://localhost:3000/api/strategy/validate
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{error::AppError, state::SharedState};

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const HEALTH_PATH: &str = "/api/health";

/// Axum middleware, installed with `middleware::from_fn_with_state`.
pub async fn require_api_key(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    // ── Dev mode: no key configured ──────────────────────────────────────────
    let Some(expected) = state.api_key.as_deref() else {
        return next.run(request).await;
    };

    // ── Health check is always open ──────────────────────────────────────────
    let path = request.uri().path();
    if path == HEALTH_PATH {
        return next.run(request).await;
    }

    // ── Check header ─────────────────────────────────────────────────────────
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided == expected {
        next.run(request).await
    } else {
        warn!(path, "❌ Unauthorized request — invalid or missing X-API-Key");
        AppError::Unauthorized.into_response()
    }
}
