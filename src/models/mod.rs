//! Domain models shared across the whole Strategist system.

pub mod strategy;

pub use strategy::{
    Condition, IndicatorOperand, IndicatorParams, Operand, Operator, Side, Strategy, Timeframe,
    ValueOperand,
};
