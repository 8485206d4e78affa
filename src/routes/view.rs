//! # routes::view
//!
//! JSON shapes for validation findings. Every issue carries its structured
//! kind and location plus the rendered human-readable message.

use serde::Serialize;

use crate::schema::{suggest_fixes, ErrorClass, Location, ValidationReport};

#[derive(Debug, Serialize)]
pub struct IssueView<'a, K: Serialize> {
    pub location: Location,
    #[serde(flatten)]
    pub kind: &'a K,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ErrorClass>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub is_valid:    bool,
    pub errors:      Vec<IssueView<'a, crate::schema::ErrorKind>>,
    pub warnings:    Vec<IssueView<'a, crate::schema::WarningKind>>,
    pub suggestions: Vec<String>,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a ValidationReport) -> Self {
        Self {
            is_valid: report.is_valid(),
            errors: report
                .errors
                .iter()
                .map(|e| IssueView {
                    location: e.location,
                    kind:     &e.kind,
                    class:    Some(e.kind.class()),
                    message:  e.to_string(),
                })
                .collect(),
            warnings: report
                .warnings
                .iter()
                .map(|w| IssueView {
                    location: w.location,
                    kind:     &w.kind,
                    class:    None,
                    message:  w.to_string(),
                })
                .collect(),
            suggestions: suggest_fixes(&report.errors),
        }
    }
}
