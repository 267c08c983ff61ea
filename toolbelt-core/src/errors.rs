// toolbelt-core/src/errors.rs
use crate::schema::ValidationIssue;
use thiserror::Error;

/// Errors that can occur while constructing a parameter schema.
///
/// These are startup invariants: a toolkit whose schema cannot be built must
/// fail to register instead of silently accepting arbitrary values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// An enumerated field was declared over zero choices.
    #[error("enumerated field '{0}' has no choices")]
    EmptyEnumeration(String),

    /// The same field name was declared twice.
    #[error("duplicate field '{0}' in parameter schema")]
    DuplicateField(String),
}

/// Errors from the configuration dialog.
#[derive(Error, Debug)]
pub enum DialogError {
    /// Submission was attempted while the draft fails schema validation.
    /// The dialog keeps its draft; the user may keep editing.
    #[error("configuration draft is not valid: {}", format_issues(.0))]
    InvalidDraft(Vec<ValidationIssue>),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
