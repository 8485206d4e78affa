//! # schema::sanitizer
//!
//! Best-effort repair of any strategy-shaped value into a typed [`Strategy`].
//!
//! Total: never fails, never mutates its input, no randomness. Conditions
//! that cannot be repaired (missing or non-object operands, non-object
//! elements) are dropped and listed in [`Sanitized::dropped`].

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{
    Condition, IndicatorOperand, IndicatorParams, Operand, Operator, Side, Strategy, Timeframe,
};
use crate::schema::registry::{self, FALLBACK_INDICATOR};

pub const UNNAMED_STRATEGY: &str = "Unnamed Strategy";
pub const INVALID_STRATEGY: &str = "Invalid Strategy";

// ─── Result ───────────────────────────────────────────────────────────────────

/// Why a condition did not survive sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    NotAnObject,
    MissingOperand(Side),
    InvalidOperand(Side),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroppedCondition {
    /// 1-based position in the input `conditions` array.
    pub index: usize,
    pub reason: DropReason,
}

/// The repaired strategy plus whatever had to be thrown away.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sanitized {
    pub strategy: Strategy,
    pub dropped: Vec<DroppedCondition>,
}

impl Sanitized {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

// ─── Strategy ─────────────────────────────────────────────────────────────────

pub fn sanitize_strategy(strategy: &Value) -> Sanitized {
    let Some(obj) = strategy.as_object() else {
        debug!("Strategy is not an object — returning empty placeholder");
        return Sanitized {
            strategy: Strategy {
                name:        INVALID_STRATEGY.to_string(),
                description: String::new(),
                conditions:  Vec::new(),
            },
            dropped: Vec::new(),
        };
    };

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNNAMED_STRATEGY)
        .to_string();

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let raw_conditions: &[Value] = match obj.get("conditions") {
        Some(Value::Array(items)) => items,
        _ => &[],
    };

    let mut conditions = Vec::with_capacity(raw_conditions.len());
    let mut dropped = Vec::new();

    for (i, raw) in raw_conditions.iter().enumerate() {
        match sanitize_condition(raw) {
            Ok(condition) => conditions.push(condition),
            Err(reason) => {
                debug!(condition = i + 1, ?reason, "Dropping unrepairable condition");
                dropped.push(DroppedCondition { index: i + 1, reason });
            }
        }
    }

    Sanitized {
        strategy: Strategy { name, description, conditions },
        dropped,
    }
}

// ─── Condition ────────────────────────────────────────────────────────────────

pub fn sanitize_condition(condition: &Value) -> Result<Condition, DropReason> {
    let obj = condition.as_object().ok_or(DropReason::NotAnObject)?;

    let lhs = sanitize_side(obj, Side::Lhs)?;
    let rhs = sanitize_side(obj, Side::Rhs)?;

    let operator = obj
        .get("operator")
        .and_then(Value::as_str)
        .and_then(Operator::parse)
        .unwrap_or(Operator::Gt);

    let tolerance = (operator == Operator::Approx).then(|| {
        obj.get("tolerance")
            .and_then(coerce_f64)
            .unwrap_or(Operator::DEFAULT_TOLERANCE)
    });

    Ok(Condition { lhs, operator, rhs, tolerance })
}

fn sanitize_side(obj: &Map<String, Value>, side: Side) -> Result<Operand, DropReason> {
    let raw = obj.get(side.key()).ok_or(DropReason::MissingOperand(side))?;
    sanitize_operand(raw, side).ok_or(DropReason::InvalidOperand(side))
}

// ─── Operand ──────────────────────────────────────────────────────────────────

/// `None` only when the operand is not an object.
pub fn sanitize_operand(operand: &Value, side: Side) -> Option<Operand> {
    let obj = operand.as_object()?;

    if obj.get("type").and_then(Value::as_str) == Some("value") {
        let value = obj.get("value").and_then(coerce_f64).unwrap_or(0.0);
        return Some(Operand::value(value));
    }

    Some(Operand::Indicator(sanitize_indicator(obj, side)))
}

fn sanitize_indicator(obj: &Map<String, Value>, side: Side) -> IndicatorOperand {
    let spec = obj
        .get("name")
        .and_then(Value::as_str)
        .and_then(|n| registry::lookup(n.trim()))
        .or_else(|| registry::lookup(FALLBACK_INDICATOR))
        .copied();

    let (name, default_period) = match spec {
        Some(spec) => (spec.name, spec.default_period),
        None => (FALLBACK_INDICATOR, None),
    };

    let timeframe = obj
        .get("timeframe")
        .and_then(Value::as_str)
        .and_then(Timeframe::parse)
        .unwrap_or_default();

    let offset = obj.get("offset").map(coerce_offset).unwrap_or(0);

    let params = IndicatorParams {
        period: default_period.map(|default| {
            obj.get("params")
                .and_then(|p| p.get("period"))
                .and_then(Value::as_u64)
                .and_then(|p| u32::try_from(p).ok())
                .filter(|p| *p >= 1)
                .unwrap_or(default)
        }),
    };

    let (multiplier, add_offset) = match side {
        Side::Rhs => (
            obj.get("multiplier").map(|v| coerce_f64(v).unwrap_or(1.0)),
            obj.get("add_offset").map(|v| coerce_f64(v).unwrap_or(0.0)),
        ),
        Side::Lhs => (None, None),
    };

    IndicatorOperand {
        name: name.to_string(),
        timeframe,
        offset,
        params,
        multiplier,
        add_offset,
    }
}

// ─── Coercions ────────────────────────────────────────────────────────────────

/// Finite number from a JSON number, numeric string or boolean.
fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Integer periods-back, truncated toward zero and clamped to `0..=u32::MAX`.
fn coerce_offset(value: &Value) -> u32 {
    let n = match value {
        Value::Number(n) => n
            .as_i64()
            .map(|i| i as f64)
            .or_else(|| n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    };
    match n {
        // `as` saturates and maps NaN to 0.
        Some(n) => n.trunc().max(0.0) as u32,
        None => 0,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
