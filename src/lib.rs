//! # Strategist
//!
//! Schema layer for stock-screening strategies produced by an LLM from
//! natural language: an indicator registry, a validator that reports every
//! error and warning, a sanitizer that repairs whatever it can, remediation
//! hints, and the HTTP service that exposes them.
//!
//! ```text
//!  raw text ─▶ pipeline ─▶ schema::validator ─┬─ valid ───▶ schema::sanitizer ─▶ Strategy
//!                                             └─ invalid ─▶ schema::suggest   ─▶ hints
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod schema;
pub mod state;

pub use models::Strategy;
pub use pipeline::{
    validate_and_autofix_if_invalid, validate_as_is, validate_then_sanitize_if_valid, Accepted,
    PipelineError,
};
pub use schema::{sanitize_strategy, suggest_fixes, validate_strategy, Sanitized, ValidationReport};
