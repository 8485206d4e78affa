//! # routes::strategy
//!
//! Axum handlers for the strategy schema endpoints.
//!
//! Bodies are taken as raw bytes and parsed here so that malformed JSON (or
//! a body that is not UTF-8) gets the same `{ ok: false, error }` envelope as
//! every other failure.

use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    error::AppError,
    models::{Operator, Timeframe},
    pipeline::{self, Accepted, PipelineError},
    routes::view::ReportView,
    schema::{registry, sanitize_strategy, validate_strategy},
    state::SharedState,
};

// ─── POST /api/strategy/validate ──────────────────────────────────────────────

/// Full report for the submitted document. An invalid strategy is still a
/// `200`: the findings are the payload.
pub async fn validate(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let value = parse(&state, &body)?;
    let report = validate_strategy(&value);
    state.record_validation();

    info!(
        valid    = report.is_valid(),
        errors   = report.errors.len(),
        warnings = report.warnings.len(),
        "📋 Strategy validated"
    );

    let mut body = serde_json::to_value(ReportView::new(&report))
        .map_err(|e| AppError::Internal(e.into()))?;
    body["ok"] = json!(true);
    Ok(Json(body))
}

// ─── POST /api/strategy/sanitize ──────────────────────────────────────────────

/// Unconditional repair. Never rejects a parseable document.
pub async fn sanitize(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let value = parse(&state, &body)?;
    let report = validate_strategy(&value);
    let sanitized = sanitize_strategy(&value);
    state.record_validation();
    if !report.is_valid() {
        state.record_repair();
    }

    info!(
        conditions = sanitized.strategy.conditions.len(),
        dropped    = sanitized.dropped_count(),
        "🔧 Strategy sanitized"
    );

    Ok(Json(json!({
        "ok":       true,
        "strategy": sanitized.strategy,
        "dropped":  sanitized.dropped,
        "report":   ReportView::new(&report),
    })))
}

// ─── POST /api/strategy/parse ─────────────────────────────────────────────────

/// Validate, then sanitize only if valid.
pub async fn parse_strategy(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    accepted(&state, pipeline::validate_then_sanitize_if_valid(&body))
}

// ─── POST /api/strategy/autofix ───────────────────────────────────────────────

/// Validate, and only if invalid try to repair.
pub async fn autofix(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    accepted(&state, pipeline::validate_and_autofix_if_invalid(&body))
}

// ─── GET /api/indicators ──────────────────────────────────────────────────────

/// The fixed vocabulary a strategy may use.
pub async fn catalogue() -> Json<Value> {
    let operators: Vec<&str> = Operator::ALL.iter().map(Operator::as_str).collect();
    let timeframes: Vec<&str> = Timeframe::ALL.iter().map(Timeframe::as_str).collect();

    Json(json!({
        "ok":         true,
        "indicators": registry::all(),
        "operators":  operators,
        "timeframes": timeframes,
    }))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn parse(state: &SharedState, body: &[u8]) -> Result<Value, AppError> {
    pipeline::parse_json(body).map_err(|e| {
        state.record_rejection();
        AppError::from(e)
    })
}

fn accepted(
    state: &SharedState,
    result: Result<Accepted, PipelineError>,
) -> Result<Json<Value>, AppError> {
    state.record_validation();

    let accepted = result.map_err(|e| {
        state.record_rejection();
        AppError::from(e)
    })?;

    if accepted.repaired {
        state.record_repair();
    }

    Ok(Json(json!({
        "ok":       true,
        "strategy": accepted.strategy,
        "repaired": accepted.repaired,
        "dropped":  accepted.dropped,
        "report":   ReportView::new(&accepted.report),
    })))
}
