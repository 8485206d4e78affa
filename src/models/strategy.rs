//! # models::strategy
//!
//! The typed strategy tree handed to the screening engine once the schema
//! layer has validated or repaired it.
//!
//! ```text
//! Strategy
//!  └─ conditions[]
//!       ├─ lhs: Operand ──┐
//!       ├─ operator       ├─ Value     { value }
//!       ├─ rhs: Operand ──┘  Indicator { name, timeframe, offset, params, multiplier?, add_offset? }
//!       └─ tolerance?        (≈ (approx) only)
//! ```
//!
//! The wire format is the JSON shape the language model is prompted to emit,
//! so every serde attribute here is part of the public contract.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Operator ─────────────────────────────────────────────────────────────────

/// Comparison joining the two sides of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
    /// Approximate equality within [`Condition::tolerance`] percent.
    #[serde(rename = "≈ (approx)", alias = "≈(approx)")]
    Approx,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Eq,
        Operator::Approx,
    ];

    /// Tolerance (percent) assumed when `≈ (approx)` arrives without one.
    pub const DEFAULT_TOLERANCE: f64 = 1.0;

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Approx => "≈ (approx)",
        }
    }

    /// Exact literal match; the compact `≈(approx)` spelling is accepted too.
    pub fn parse(literal: &str) -> Option<Self> {
        if literal == "≈(approx)" {
            return Some(Operator::Approx);
        }
        Self::ALL.into_iter().find(|op| op.as_str() == literal)
    }

    /// `['>', '<', ...]`, as used in error messages and prompts.
    pub fn listing() -> String {
        quoted_list(Self::ALL.iter().map(Operator::as_str))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Timeframe ────────────────────────────────────────────────────────────────

/// Sampling granularity an indicator is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Daily, Timeframe::Weekly, Timeframe::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }

    /// Case-sensitive, like the wire format.
    pub fn parse(literal: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tf| tf.as_str() == literal)
    }

    pub fn listing() -> String {
        quoted_list(Self::ALL.iter().map(Timeframe::as_str))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Side ─────────────────────────────────────────────────────────────────────

/// Which side of a condition an operand sits on.
///
/// `multiplier` / `add_offset` only mean something on the right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Lhs,
    Rhs,
}

impl Side {
    /// JSON key of this side inside a condition object.
    pub fn key(&self) -> &'static str {
        match self {
            Side::Lhs => "lhs",
            Side::Rhs => "rhs",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Lhs => f.write_str("LHS"),
            Side::Rhs => f.write_str("RHS"),
        }
    }
}

// ─── Operands ─────────────────────────────────────────────────────────────────

/// A literal number, e.g. the `30` in `rsi < 30`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueOperand {
    pub value: f64,
}

/// Indicator parameters. Only `period` exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
}

/// Reference to a registry indicator evaluated `offset` periods back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorOperand {
    pub name: String,

    #[serde(default)]
    pub timeframe: Timeframe,

    /// Periods back from the most recent bar (0 = current).
    #[serde(default)]
    pub offset: u32,

    #[serde(default)]
    pub params: IndicatorParams,

    /// RHS only: the indicator value is scaled by this factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,

    /// RHS only: added after `multiplier` is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_offset: Option<f64>,
}

/// One side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operand {
    Value(ValueOperand),
    Indicator(IndicatorOperand),
}

impl Operand {
    pub fn value(value: f64) -> Self {
        Operand::Value(ValueOperand { value })
    }
}

// ─── Condition / Strategy ─────────────────────────────────────────────────────

/// `lhs operator rhs`, optionally with a percent tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub lhs: Operand,
    pub operator: Operator,
    pub rhs: Operand,

    /// Percent band for [`Operator::Approx`]; absent for every other operator
    /// once sanitized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

/// A complete screening rule set. All conditions must hold (logical AND).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub conditions: Vec<Condition>,
}

impl Strategy {
    /// Back to the untyped wire shape, e.g. for re-validation.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
