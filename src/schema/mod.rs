//! # schema
//!
//! Vocabulary, validation, repair and remediation hints for strategy trees.

pub mod issue;
pub mod registry;
pub mod sanitizer;
pub mod suggest;
pub mod validator;

pub use issue::{ErrorClass, ErrorKind, Location, SchemaError, SchemaWarning, WarningKind};
pub use registry::{IndicatorCategory, IndicatorSpec};
pub use sanitizer::{sanitize_strategy, DropReason, DroppedCondition, Sanitized};
pub use suggest::suggest_fixes;
pub use validator::{validate_strategy, ValidationReport};
