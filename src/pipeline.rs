//! # pipeline
//!
//! Entry points that take the raw JSON text extracted from a model response
//! (or posted by a user) and turn it into a typed [`Strategy`].
//!
//! The two callers sequence validation and repair differently, so both shapes
//! are kept:
//!
//! ```text
//! validate_then_sanitize_if_valid   parse ─▶ validate ─┬─ valid   ─▶ sanitize ─▶ Ok
//!                                                      └─ invalid ─▶ Err(Rejected)
//!
//! validate_and_autofix_if_invalid   parse ─▶ validate ─┬─ valid   ─▶ as-is ─▶ Ok
//!                                                      └─ invalid ─▶ sanitize ─▶ re-validate ─┬─ Ok
//!                                                                                             └─ Err(Unfixable)
//! ```

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Strategy;
use crate::schema::{sanitize_strategy, validate_strategy, DroppedCondition, ValidationReport};

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The text is not JSON at all. Carries the parser's diagnostic.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Validation failed and this path does not repair.
    #[error("Invalid strategy: {}", .0.joined_errors())]
    Rejected(ValidationReport),

    /// Validation failed and the repaired strategy is still invalid.
    #[error("Could not fix strategy: {}", .0.joined_errors())]
    Unfixable(ValidationReport),
}

impl PipelineError {
    /// The report behind a rejection, if any.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            PipelineError::InvalidJson(_) => None,
            PipelineError::Rejected(report) | PipelineError::Unfixable(report) => Some(report),
        }
    }
}

// ─── Output ───────────────────────────────────────────────────────────────────

/// A strategy accepted by one of the entry points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accepted {
    pub strategy: Strategy,
    /// Findings for the strategy as it was submitted.
    pub report: ValidationReport,
    /// `true` when the strategy only became valid through sanitization.
    pub repaired: bool,
    /// Conditions the sanitizer had to throw away.
    pub dropped: Vec<DroppedCondition>,
}

// ─── Entry points ─────────────────────────────────────────────────────────────

/// Accepts `&str`, `String` or raw request bytes; invalid UTF-8 is an
/// `InvalidJson` like any other syntax error.
pub fn parse_json(raw: impl AsRef<[u8]>) -> Result<Value, PipelineError> {
    Ok(serde_json::from_slice(raw.as_ref())?)
}

/// Parse, validate and, only if valid, return the sanitized copy.
pub fn validate_then_sanitize_if_valid(raw: impl AsRef<[u8]>) -> Result<Accepted, PipelineError> {
    let value = parse_json(raw)?;
    let report = validate_strategy(&value);

    if !report.is_valid() {
        debug!(errors = report.errors.len(), "Strategy rejected");
        return Err(PipelineError::Rejected(report));
    }

    let sanitized = sanitize_strategy(&value);
    Ok(Accepted {
        strategy: sanitized.strategy,
        report,
        repaired: false,
        dropped: sanitized.dropped,
    })
}

/// Parse and validate; a valid strategy is returned untouched (no defaults
/// filled in), an invalid one is rejected.
pub fn validate_as_is(raw: impl AsRef<[u8]>) -> Result<Accepted, PipelineError> {
    let value = parse_json(raw)?;
    accept_as_is(&value, validate_strategy(&value))
}

/// Parse and validate; only an invalid strategy is sanitized, then
/// re-validated.
pub fn validate_and_autofix_if_invalid(raw: impl AsRef<[u8]>) -> Result<Accepted, PipelineError> {
    let value = parse_json(raw)?;
    let report = validate_strategy(&value);

    if report.is_valid() {
        return accept_as_is(&value, report);
    }

    info!(
        errors = report.errors.len(),
        "🔧 Strategy invalid — attempting auto-fix"
    );

    let sanitized = sanitize_strategy(&value);
    let recheck = validate_strategy(&sanitized.strategy.to_value());

    if !recheck.is_valid() {
        warn!(errors = %recheck.joined_errors(), "❌ Auto-fix could not produce a valid strategy");
        return Err(PipelineError::Unfixable(recheck));
    }

    info!(
        dropped = sanitized.dropped.len(),
        "✅ Strategy repaired"
    );

    Ok(Accepted {
        strategy: sanitized.strategy,
        report,
        repaired: true,
        dropped: sanitized.dropped,
    })
}

/// Typed view of an already-valid value. Falls back to the sanitizer for the
/// few shapes the validator tolerates but the typed model cannot hold (e.g. a
/// non-string description).
fn accept_as_is(value: &Value, report: ValidationReport) -> Result<Accepted, PipelineError> {
    if !report.is_valid() {
        return Err(PipelineError::Rejected(report));
    }

    match serde_json::from_value::<Strategy>(value.clone()) {
        Ok(strategy) => Ok(Accepted { strategy, report, repaired: false, dropped: Vec::new() }),
        Err(e) => {
            debug!(error = %e, "Valid strategy does not map onto the typed model — sanitizing");
            let sanitized = sanitize_strategy(value);
            Ok(Accepted {
                strategy: sanitized.strategy,
                report,
                repaired: true,
                dropped: sanitized.dropped,
            })
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
