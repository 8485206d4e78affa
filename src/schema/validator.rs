//! # schema::validator
//!
//! Structural validation of an untyped strategy value.
//!
//! Returns **all** errors and warnings, not just the first. Every function is
//! pure: warnings are pushed into the caller's accumulator and the final
//! [`ValidationReport`] is returned by value, so one validation can never see
//! another's findings.
//!
//! ```text
//! validate_strategy
//!   ├─ name / description / conditions
//!   └─ validate_condition  (per element, no short-circuit across conditions)
//!        ├─ lhs / operator / rhs / tolerance
//!        └─ validate_operand ─▶ validate_indicator
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{Operator, Side, Timeframe};
use crate::schema::issue::{render, ErrorKind, Location, SchemaError, SchemaWarning, WarningKind};
use crate::schema::registry;

// ─── Report ───────────────────────────────────────────────────────────────────

/// Outcome of one validation pass. Immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<SchemaError>,
    pub warnings: Vec<SchemaWarning>,
}

impl ValidationReport {
    /// Warnings never affect validity.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// All error messages joined with `"; "`.
    pub fn joined_errors(&self) -> String {
        self.error_messages().join("; ")
    }
}

// ─── Strategy ─────────────────────────────────────────────────────────────────

/// Validate a complete strategy value.
pub fn validate_strategy(strategy: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let Some(obj) = strategy.as_object() else {
        errors.push(SchemaError::new(
            Location::Strategy,
            ErrorKind::NotAnObject { what: "Strategy" },
        ));
        return ValidationReport { errors, warnings };
    };

    match obj.get("name") {
        None => errors.push(SchemaError::new(
            Location::Strategy,
            ErrorKind::MissingField { field: "name" },
        )),
        Some(name) if !name.as_str().is_some_and(|s| !s.trim().is_empty()) => {
            errors.push(SchemaError::new(Location::Strategy, ErrorKind::EmptyName))
        }
        Some(_) => {}
    }

    if !obj.contains_key("description") {
        warnings.push(SchemaWarning::new(Location::Strategy, WarningKind::MissingDescription));
    }

    match obj.get("conditions") {
        None => errors.push(SchemaError::new(
            Location::Strategy,
            ErrorKind::MissingField { field: "conditions" },
        )),
        Some(Value::Array(conditions)) if conditions.is_empty() => {
            errors.push(SchemaError::new(Location::Strategy, ErrorKind::EmptyConditions))
        }
        Some(Value::Array(conditions)) => {
            for (i, condition) in conditions.iter().enumerate() {
                if let Err(err) = validate_condition(condition, i + 1, &mut warnings) {
                    errors.push(err);
                }
            }
        }
        Some(_) => errors.push(SchemaError::new(Location::Strategy, ErrorKind::ConditionsNotArray)),
    }

    debug!(
        errors   = errors.len(),
        warnings = warnings.len(),
        "Strategy validated"
    );

    ValidationReport { errors, warnings }
}

// ─── Condition ────────────────────────────────────────────────────────────────

/// Validate one condition (`index` is 1-based). Stops at the first failure;
/// warnings found before it are kept.
pub fn validate_condition(
    condition: &Value,
    index: usize,
    warnings: &mut Vec<SchemaWarning>,
) -> Result<(), SchemaError> {
    let here = Location::Condition { index };
    let fail = |kind| Err(SchemaError::new(here, kind));

    let Some(obj) = condition.as_object() else {
        return fail(ErrorKind::NotAnObject { what: "Condition" });
    };

    for field in ["lhs", "operator", "rhs"] {
        if !obj.contains_key(field) {
            return fail(ErrorKind::MissingField { field });
        }
    }

    let operator = match obj["operator"].as_str().and_then(Operator::parse) {
        Some(op) => op,
        None => return fail(ErrorKind::InvalidOperator { found: render(&obj["operator"]) }),
    };

    if operator == Operator::Approx && !obj.contains_key("tolerance") {
        warnings.push(SchemaWarning::new(
            here,
            WarningKind::MissingTolerance { default: Operator::DEFAULT_TOLERANCE },
        ));
    }

    for side in [Side::Lhs, Side::Rhs] {
        validate_operand(&obj[side.key()], side, index, warnings)
            .map_err(|kind| SchemaError::new(Location::Operand { index, side }, kind))?;
    }

    Ok(())
}

// ─── Operand ──────────────────────────────────────────────────────────────────

/// Validate one operand of condition `index`.
pub fn validate_operand(
    operand: &Value,
    side: Side,
    index: usize,
    warnings: &mut Vec<SchemaWarning>,
) -> Result<(), ErrorKind> {
    let Some(obj) = operand.as_object() else {
        return Err(ErrorKind::NotAnObject { what: "Operand" });
    };

    let Some(op_type) = obj.get("type") else {
        return Err(ErrorKind::MissingField { field: "type" });
    };

    match op_type.as_str() {
        Some("value") => match obj.get("value") {
            None => Err(ErrorKind::MissingField { field: "value" }),
            Some(v) if !v.is_number() => Err(ErrorKind::NotNumeric { field: "value" }),
            Some(_) => Ok(()),
        },
        Some("indicator") => {
            validate_indicator(obj, Location::Operand { index, side }, side, warnings)
        }
        _ => Err(ErrorKind::InvalidOperandType { found: render(op_type) }),
    }
}

fn validate_indicator(
    obj: &Map<String, Value>,
    here: Location,
    side: Side,
    warnings: &mut Vec<SchemaWarning>,
) -> Result<(), ErrorKind> {
    // ── name ──────────────────────────────────────────────────────────────────
    let Some(raw_name) = obj.get("name") else {
        return Err(ErrorKind::MissingField { field: "name" });
    };
    let name = render(raw_name).to_lowercase();
    let spec = raw_name
        .as_str()
        .and_then(registry::lookup)
        .ok_or_else(|| ErrorKind::UnknownIndicator { found: name.clone() })?;

    // ── timeframe ─────────────────────────────────────────────────────────────
    match obj.get("timeframe") {
        None => warnings.push(SchemaWarning::new(
            here,
            WarningKind::MissingTimeframe { indicator: name.clone() },
        )),
        Some(tf) if tf.as_str().and_then(Timeframe::parse).is_none() => {
            return Err(ErrorKind::InvalidTimeframe { found: render(tf) });
        }
        Some(_) => {}
    }

    // ── offset ────────────────────────────────────────────────────────────────
    if let Some(offset) = obj.get("offset") {
        match offset.as_u64() {
            None => return Err(ErrorKind::InvalidOffset),
            Some(n) if u32::try_from(n).is_err() => return Err(ErrorKind::OffsetTooLarge),
            Some(_) => {}
        }
    }

    // ── period ────────────────────────────────────────────────────────────────
    if let Some(default) = spec.default_period {
        match obj.get("params").and_then(|p| p.get("period")) {
            None => warnings.push(SchemaWarning::new(
                here,
                WarningKind::MissingPeriod { indicator: name, default },
            )),
            Some(period) if !as_u32(period).is_some_and(|p| p >= 1) => {
                return Err(ErrorKind::InvalidPeriod { indicator: name });
            }
            Some(_) => {}
        }
    }

    // ── RHS-only fields ───────────────────────────────────────────────────────
    for field in ["multiplier", "add_offset"] {
        let Some(v) = obj.get(field) else { continue };
        match side {
            Side::Rhs if !v.is_number() => return Err(ErrorKind::NotNumeric { field }),
            Side::Rhs => {}
            Side::Lhs => warnings.push(SchemaWarning::new(here, WarningKind::RhsOnlyField { field })),
        }
    }

    Ok(())
}

/// Non-negative JSON integer that fits the typed model.
fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rsi_below(value: Value) -> Value {
        json!({
            "name": "Oversold",
            "description": "RSI under 30",
            "conditions": [{
                "lhs": { "type": "indicator", "name": "rsi", "timeframe": "daily", "params": { "period": 14 } },
                "operator": "<",
                "rhs": { "type": "value", "value": value }
            }]
        })
    }

    fn only_error(report: &ValidationReport) -> &SchemaError {
        assert_eq!(report.errors.len(), 1, "errors: {:?}", report.error_messages());
        &report.errors[0]
    }

    #[test]
    fn test_clean_strategy_has_no_findings() {
        let report = validate_strategy(&rsi_below(json!(30)));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty(), "{:?}", report.warning_messages());
    }

    #[test]
    fn test_not_an_object() {
        let report = validate_strategy(&json!([1, 2, 3]));
        assert_eq!(report.error_messages(), vec!["Strategy must be a JSON object"]);
    }

    #[test]
    fn test_missing_conditions_is_reported() {
        let report = validate_strategy(&json!({ "name": "x", "description": "" }));
        assert!(!report.is_valid());
        assert!(report.error_messages()[0].contains("conditions"));
    }

    #[test]
    fn test_conditions_shape_errors() {
        let empty = validate_strategy(&json!({ "name": "x", "conditions": [] }));
        assert_eq!(only_error(&empty).kind, ErrorKind::EmptyConditions);

        let not_array = validate_strategy(&json!({ "name": "x", "conditions": {} }));
        assert_eq!(only_error(&not_array).kind, ErrorKind::ConditionsNotArray);
    }

    #[test]
    fn test_name_rules() {
        let mut doc = rsi_below(json!(30));
        doc["name"] = json!("   ");
        assert_eq!(only_error(&validate_strategy(&doc)).kind, ErrorKind::EmptyName);

        doc["name"] = json!(42);
        assert_eq!(only_error(&validate_strategy(&doc)).kind, ErrorKind::EmptyName);

        doc.as_object_mut().unwrap().remove("name");
        assert_eq!(
            only_error(&validate_strategy(&doc)).to_string(),
            "Missing required field: 'name'"
        );
    }

    #[test]
    fn test_oversold_scenario_warns_but_is_valid() {
        let report = validate_strategy(&json!({
            "name": "Oversold",
            "conditions": [{
                "lhs": { "type": "indicator", "name": "rsi" },
                "operator": "<",
                "rhs": { "type": "value", "value": 30 }
            }]
        }));

        assert!(report.is_valid());
        assert!(report.errors.is_empty());
        let kinds: Vec<&WarningKind> = report.warnings.iter().map(|w| &w.kind).collect();
        assert!(kinds.contains(&&WarningKind::MissingDescription));
        assert!(kinds.contains(&&WarningKind::MissingTimeframe { indicator: "rsi".into() }));
        assert!(kinds.contains(&&WarningKind::MissingPeriod { indicator: "rsi".into(), default: 14 }));
    }

    #[test]
    fn test_every_bad_condition_is_reported() {
        let report = validate_strategy(&json!({
            "name": "Broken",
            "description": "",
            "conditions": [
                { "operator": ">", "rhs": { "type": "value", "value": 1 } },
                { "lhs": { "type": "indicator", "name": "close", "timeframe": "daily" },
                  "operator": "~=",
                  "rhs": { "type": "value", "value": 1 } },
                "not a condition"
            ]
        }));

        assert_eq!(
            report.error_messages(),
            vec![
                "Condition 1: Missing required field: 'lhs'".to_string(),
                format!("Condition 2: Invalid operator '~='. Valid: {}", Operator::listing()),
                "Condition 3: Condition must be a JSON object".to_string(),
            ]
        );
    }

    #[test]
    fn test_operand_errors_carry_side() {
        let report = validate_strategy(&rsi_below(json!("thirty")));
        let err = only_error(&report);
        assert_eq!(err.location, Location::Operand { index: 1, side: Side::Rhs });
        assert_eq!(err.to_string(), "Condition 1: RHS error: 'value' must be a number");
    }

    #[test]
    fn test_invalid_operand_type() {
        let mut doc = rsi_below(json!(30));
        doc["conditions"][0]["rhs"] = json!({ "type": "constant", "value": 30 });
        assert_eq!(
            only_error(&validate_strategy(&doc)).kind,
            ErrorKind::InvalidOperandType { found: "constant".into() }
        );

        doc["conditions"][0]["rhs"] = json!({ "value": 30 });
        assert_eq!(
            only_error(&validate_strategy(&doc)).kind,
            ErrorKind::MissingField { field: "type" }
        );
    }

    #[test]
    fn test_indicator_name_is_case_insensitive() {
        let mut doc = rsi_below(json!(30));
        doc["conditions"][0]["lhs"]["name"] = json!("RSI");
        assert!(validate_strategy(&doc).is_valid());

        doc["conditions"][0]["lhs"]["name"] = json!("Stochastic");
        assert_eq!(
            only_error(&validate_strategy(&doc)).kind,
            ErrorKind::UnknownIndicator { found: "stochastic".into() }
        );
    }

    #[test]
    fn test_invalid_timeframe_is_an_error() {
        let mut doc = rsi_below(json!(30));
        doc["conditions"][0]["lhs"]["timeframe"] = json!("hourly");
        assert_eq!(
            only_error(&validate_strategy(&doc)).kind,
            ErrorKind::InvalidTimeframe { found: "hourly".into() }
        );
    }

    #[test]
    fn test_offset_and_period_ranges() {
        let mut doc = rsi_below(json!(30));
        doc["conditions"][0]["lhs"]["offset"] = json!(-5);
        assert_eq!(only_error(&validate_strategy(&doc)).kind, ErrorKind::InvalidOffset);

        doc["conditions"][0]["lhs"]["offset"] = json!(5_000_000_000u64);
        let report = validate_strategy(&doc);
        assert_eq!(only_error(&report).kind, ErrorKind::OffsetTooLarge);
        assert_eq!(
            report.errors[0].to_string(),
            "Condition 1: LHS error: 'offset' must be at most 4294967295"
        );

        doc["conditions"][0]["lhs"]["offset"] = json!(2);
        doc["conditions"][0]["lhs"]["params"]["period"] = json!(0);
        let report = validate_strategy(&doc);
        assert_eq!(only_error(&report).kind, ErrorKind::InvalidPeriod { indicator: "rsi".into() });
        assert_eq!(
            report.errors[0].to_string(),
            "Condition 1: LHS error: 'rsi' period must be a positive integer"
        );

        doc["conditions"][0]["lhs"]["params"]["period"] = json!(14.5);
        assert!(!validate_strategy(&doc).is_valid());
    }

    #[test]
    fn test_period_not_required_for_price_fields() {
        let mut doc = rsi_below(json!(30));
        doc["conditions"][0]["lhs"] = json!({ "type": "indicator", "name": "close", "timeframe": "weekly" });
        let report = validate_strategy(&doc);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_rhs_only_fields() {
        let mut doc = rsi_below(json!(30));
        doc["conditions"][0]["rhs"] = json!({
            "type": "indicator", "name": "sma", "timeframe": "daily",
            "params": { "period": 50 }, "multiplier": "1.1"
        });
        assert_eq!(
            only_error(&validate_strategy(&doc)).kind,
            ErrorKind::NotNumeric { field: "multiplier" }
        );

        doc["conditions"][0]["rhs"]["multiplier"] = json!(1.1);
        doc["conditions"][0]["lhs"]["add_offset"] = json!(2);
        let report = validate_strategy(&doc);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings[0].kind,
            WarningKind::RhsOnlyField { field: "add_offset" }
        );
    }

    #[test]
    fn test_approx_without_tolerance_warns() {
        let mut doc = rsi_below(json!(30));
        doc["conditions"][0]["operator"] = json!("≈ (approx)");
        let report = validate_strategy(&doc);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![SchemaWarning::new(
                Location::Condition { index: 1 },
                WarningKind::MissingTolerance { default: 1.0 },
            )]
        );

        doc["conditions"][0]["tolerance"] = json!(0.5);
        assert!(validate_strategy(&doc).warnings.is_empty());
    }

    #[test]
    fn test_warnings_before_failure_are_kept() {
        let report = validate_strategy(&json!({
            "name": "Half",
            "description": "",
            "conditions": [{
                "lhs": { "type": "indicator", "name": "ema" },
                "operator": ">",
                "rhs": { "type": "indicator", "name": "nope" }
            }]
        }));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0].location, Location::Operand { index: 1, side: Side::Lhs });
    }
}
