//! # schema::issue
//!
//! Structured validation findings. Each finding is a `kind` (what is wrong,
//! with its payload) plus a [`Location`] (where). The human-readable text is
//! derived from both, and suggestions key off the kind, never the text.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Operator, Side, Timeframe};
use crate::schema::registry;

// ─── Location ─────────────────────────────────────────────────────────────────

/// Where in the strategy tree a finding applies. Indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Location {
    Strategy,
    Condition { index: usize },
    Operand { index: usize, side: Side },
}

// ─── Error kinds ──────────────────────────────────────────────────────────────

/// Coarse error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Not an object, or a required field missing / wrong-shaped.
    Structural,
    /// Operator, timeframe or indicator outside the fixed vocabulary.
    Vocabulary,
    /// Negative offset, non-positive period.
    Range,
    /// A field that must be numeric is not.
    Type,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("{what} must be a JSON object")]
    NotAnObject { what: &'static str },

    #[error("Missing required field: '{field}'")]
    MissingField { field: &'static str },

    #[error("'name' must be a non-empty string")]
    EmptyName,

    #[error("'conditions' must be an array")]
    ConditionsNotArray,

    #[error("'conditions' array cannot be empty")]
    EmptyConditions,

    #[error("Invalid operator '{found}'. Valid: {}", Operator::listing())]
    InvalidOperator { found: String },

    #[error("Invalid type '{found}'. Must be 'indicator' or 'value'")]
    InvalidOperandType { found: String },

    #[error("'{field}' must be a number")]
    NotNumeric { field: &'static str },

    #[error("Unknown indicator '{found}'. Valid indicators: {}", registry::listing())]
    UnknownIndicator { found: String },

    #[error("Invalid timeframe '{found}'. Valid: {}", Timeframe::listing())]
    InvalidTimeframe { found: String },

    #[error("'offset' must be a non-negative integer")]
    InvalidOffset,

    #[error("'offset' must be at most {}", u32::MAX)]
    OffsetTooLarge,

    #[error("'{indicator}' period must be a positive integer")]
    InvalidPeriod { indicator: String },
}

impl ErrorKind {
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::NotAnObject { .. }
            | ErrorKind::MissingField { .. }
            | ErrorKind::EmptyName
            | ErrorKind::ConditionsNotArray
            | ErrorKind::EmptyConditions
            | ErrorKind::InvalidOperandType { .. } => ErrorClass::Structural,
            ErrorKind::InvalidOperator { .. }
            | ErrorKind::UnknownIndicator { .. }
            | ErrorKind::InvalidTimeframe { .. } => ErrorClass::Vocabulary,
            ErrorKind::InvalidOffset
            | ErrorKind::OffsetTooLarge
            | ErrorKind::InvalidPeriod { .. } => ErrorClass::Range,
            ErrorKind::NotNumeric { .. } => ErrorClass::Type,
        }
    }
}

/// A fatal finding: the strategy is invalid while any of these exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaError {
    pub location: Location,
    #[serde(flatten)]
    pub kind: ErrorKind,
}

impl SchemaError {
    pub fn new(location: Location, kind: ErrorKind) -> Self {
        Self { location, kind }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Location::Strategy => write!(f, "{}", self.kind),
            Location::Condition { index } => write!(f, "Condition {index}: {}", self.kind),
            Location::Operand { index, side } => {
                write!(f, "Condition {index}: {side} error: {}", self.kind)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

// ─── Warning kinds ────────────────────────────────────────────────────────────

/// Deviations that have a safe default. Never affect validity.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    #[error("Missing 'description' field - recommended for clarity")]
    MissingDescription,

    #[error("'{indicator}' missing 'timeframe' - defaulting to 'daily'")]
    MissingTimeframe { indicator: String },

    #[error("'{indicator}' missing 'period' - defaulting to {default}")]
    MissingPeriod { indicator: String, default: u32 },

    #[error("'≈ (approx)' operator without 'tolerance' - defaulting to {default}%")]
    MissingTolerance { default: f64 },

    #[error("'{field}' on LHS will be ignored - only valid for RHS")]
    RhsOnlyField { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaWarning {
    pub location: Location,
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl SchemaWarning {
    pub fn new(location: Location, kind: WarningKind) -> Self {
        Self { location, kind }
    }
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Location::Strategy => write!(f, "{}", self.kind),
            Location::Condition { index } => write!(f, "Condition {index}: {}", self.kind),
            Location::Operand { index, side } => write!(f, "Condition {index} {side}: {}", self.kind),
        }
    }
}

/// Renders an offending JSON value for a message: strings bare, anything else
/// as compact JSON.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operand_error_message_names_side() {
        let err = SchemaError::new(
            Location::Operand { index: 2, side: Side::Rhs },
            ErrorKind::NotNumeric { field: "multiplier" },
        );
        assert_eq!(err.to_string(), "Condition 2: RHS error: 'multiplier' must be a number");
        assert_eq!(err.kind.class(), ErrorClass::Type);
    }

    #[test]
    fn test_vocabulary_messages_list_allowed_values() {
        let op = ErrorKind::InvalidOperator { found: "~=".into() };
        assert!(op.to_string().contains("'>='"));
        assert!(op.to_string().contains("'≈ (approx)'"));

        let ind = ErrorKind::UnknownIndicator { found: "nope".into() };
        assert!(ind.to_string().starts_with("Unknown indicator 'nope'. Valid indicators: ['close'"));
        assert_eq!(ind.class(), ErrorClass::Vocabulary);
    }

    #[test]
    fn test_error_serializes_kind_and_location() {
        let err = SchemaError::new(
            Location::Condition { index: 1 },
            ErrorKind::MissingField { field: "lhs" },
        );
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "location": { "scope": "condition", "index": 1 },
                "kind": "missing_field",
                "field": "lhs"
            })
        );
    }

    #[test]
    fn test_warning_message() {
        let warn = SchemaWarning::new(
            Location::Condition { index: 3 },
            WarningKind::MissingTolerance { default: 1.0 },
        );
        assert_eq!(
            warn.to_string(),
            "Condition 3: '≈ (approx)' operator without 'tolerance' - defaulting to 1%"
        );
    }

    #[test]
    fn test_render_offending_values() {
        assert_eq!(render(&json!("hourly")), "hourly");
        assert_eq!(render(&json!(5)), "5");
        assert_eq!(render(&json!(null)), "null");
    }
}
