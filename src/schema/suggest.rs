//! # schema::suggest
//!
//! Remediation hints for validation errors, keyed by [`ErrorKind`]. Advisory
//! only; never affects validity.

use crate::models::{Operator, Timeframe};
use crate::schema::issue::{ErrorKind, Location, SchemaError};
use crate::schema::registry;

/// One hint per error that has one, in error order.
pub fn suggest_fixes(errors: &[SchemaError]) -> Vec<String> {
    errors.iter().filter_map(suggestion_for).collect()
}

pub fn suggestion_for(error: &SchemaError) -> Option<String> {
    let hint = match (&error.location, &error.kind) {
        (Location::Strategy, ErrorKind::MissingField { field: "name" } | ErrorKind::EmptyName) => {
            "Add a 'name' field with a descriptive strategy name".to_string()
        }
        (
            Location::Strategy,
            ErrorKind::MissingField { field: "conditions" }
            | ErrorKind::EmptyConditions
            | ErrorKind::ConditionsNotArray,
        ) => "Add a 'conditions' array with at least one condition".to_string(),
        (_, ErrorKind::UnknownIndicator { .. }) => {
            format!("Valid indicators: {}", registry::listing())
        }
        (_, ErrorKind::InvalidOperator { .. }) => format!("Valid operators: {}", Operator::listing()),
        (_, ErrorKind::InvalidTimeframe { .. }) => {
            format!("Valid timeframes: {}", Timeframe::listing())
        }
        (_, ErrorKind::InvalidPeriod { .. }) => {
            "Period should be a positive integer like 14, 20, 50, etc.".to_string()
        }
        (_, ErrorKind::InvalidOffset | ErrorKind::OffsetTooLarge) => {
            "Offset counts periods back: 0 for the latest bar, 1 for the one before, etc.".to_string()
        }
        (_, ErrorKind::InvalidOperandType { .. }) => {
            "Each side must be {\"type\": \"indicator\", ...} or {\"type\": \"value\", \"value\": <number>}"
                .to_string()
        }
        _ => return None,
    };
    Some(hint)
}
