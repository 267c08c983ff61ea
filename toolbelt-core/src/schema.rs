// toolbelt-core/src/schema.rs

//! Declarative parameter schemas for toolkit configuration values.
//!
//! A schema declares the shape a configuration draft must satisfy before a
//! toolkit can be enabled. Validation never panics and never throws: it
//! returns either success or the full list of reasons the draft fails, so a
//! frontend can keep the submit affordance disabled while the user edits.

use crate::errors::SchemaError;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fmt;

/// The kind of value a configuration field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    /// Any string.
    String,
    /// A string drawn from a closed set of choices.
    Enum(Vec<String>),
}

/// A single declared configuration field.
#[derive(Debug, Clone)]
pub struct ParameterField {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub kind: ParameterKind,
}

impl ParameterField {
    pub fn string(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            kind: ParameterKind::String,
        }
    }

    /// An enumerated field. Fails if the choice set is empty: an enumeration
    /// over zero choices can never validate anything, which is a programming
    /// or configuration error rather than a user-facing condition.
    pub fn enumeration(
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
        choices: Vec<String>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if choices.is_empty() {
            return Err(SchemaError::EmptyEnumeration(name));
        }
        Ok(Self {
            name,
            description: description.into(),
            required,
            kind: ParameterKind::Enum(choices),
        })
    }
}

/// The declared shape of a toolkit's configuration value.
#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    fields: Vec<ParameterField>,
}

/// One reason a configuration draft fails validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    NotAnObject,
    MissingField(String),
    UnknownField(String),
    NotAString(String),
    NotInEnumeration { field: String, value: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NotAnObject => write!(f, "configuration value is not an object"),
            ValidationIssue::MissingField(name) => {
                write!(f, "missing required field '{}'", name)
            }
            ValidationIssue::UnknownField(name) => write!(f, "unknown field '{}'", name),
            ValidationIssue::NotAString(name) => {
                write!(f, "field '{}' must be a string", name)
            }
            ValidationIssue::NotInEnumeration { field, value } => {
                write!(f, "'{}' is not an allowed value for field '{}'", value, field)
            }
        }
    }
}

impl ParameterSchema {
    /// A schema with no fields. Toolkits with an empty schema are enabled
    /// without opening the configuration dialog.
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn new(fields: Vec<ParameterField>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[ParameterField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate a candidate configuration value against this schema.
    ///
    /// Returns every issue found, not just the first, so the dialog can show
    /// the complete picture while submission stays disabled.
    pub fn validate(&self, value: &JsonValue) -> Result<(), Vec<ValidationIssue>> {
        let Some(object) = value.as_object() else {
            return Err(vec![ValidationIssue::NotAnObject]);
        };

        let mut issues = Vec::new();

        for field in &self.fields {
            match object.get(&field.name) {
                None => {
                    if field.required {
                        issues.push(ValidationIssue::MissingField(field.name.clone()));
                    }
                }
                Some(JsonValue::String(s)) => {
                    if let ParameterKind::Enum(choices) = &field.kind {
                        if !choices.iter().any(|c| c == s) {
                            issues.push(ValidationIssue::NotInEnumeration {
                                field: field.name.clone(),
                                value: s.clone(),
                            });
                        }
                    }
                }
                Some(_) => issues.push(ValidationIssue::NotAString(field.name.clone())),
            }
        }

        for key in object.keys() {
            if !self.fields.iter().any(|f| &f.name == key) {
                issues.push(ValidationIssue::UnknownField(key.clone()));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model_schema() -> ParameterSchema {
        ParameterSchema::new(vec![ParameterField::enumeration(
            "model",
            "Image model to use",
            true,
            vec!["openai:dall-e-3".into(), "openai:dall-e-2".into()],
        )
        .unwrap()])
        .unwrap()
    }

    #[test]
    fn empty_schema_accepts_empty_object() {
        assert!(ParameterSchema::empty().validate(&json!({})).is_ok());
    }

    #[test]
    fn enumeration_over_zero_choices_is_a_construction_error() {
        let err = ParameterField::enumeration("model", "", true, vec![]).unwrap_err();
        assert_eq!(err, SchemaError::EmptyEnumeration("model".into()));
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let fields = vec![
            ParameterField::string("model", "", true),
            ParameterField::string("model", "", false),
        ];
        assert_eq!(
            ParameterSchema::new(fields).unwrap_err(),
            SchemaError::DuplicateField("model".into())
        );
    }

    #[test]
    fn member_of_enumeration_validates() {
        let schema = model_schema();
        assert!(schema.validate(&json!({"model": "openai:dall-e-3"})).is_ok());
    }

    #[test]
    fn value_outside_enumeration_fails() {
        let schema = model_schema();
        let issues = schema
            .validate(&json!({"model": "openai:gpt-image-9"}))
            .unwrap_err();
        assert_eq!(
            issues,
            vec![ValidationIssue::NotInEnumeration {
                field: "model".into(),
                value: "openai:gpt-image-9".into(),
            }]
        );
    }

    #[test]
    fn missing_required_field_fails() {
        let schema = model_schema();
        let issues = schema.validate(&json!({})).unwrap_err();
        assert_eq!(issues, vec![ValidationIssue::MissingField("model".into())]);
    }

    #[test]
    fn non_object_draft_fails_distinctly() {
        let schema = model_schema();
        let issues = schema.validate(&json!("openai:dall-e-3")).unwrap_err();
        assert_eq!(issues, vec![ValidationIssue::NotAnObject]);
    }

    #[test]
    fn optional_field_may_be_absent_but_not_mistyped() {
        let schema = ParameterSchema::new(vec![ParameterField::string("style", "", false)]).unwrap();
        assert!(schema.validate(&json!({})).is_ok());
        let issues = schema.validate(&json!({"style": 42})).unwrap_err();
        assert_eq!(issues, vec![ValidationIssue::NotAString("style".into())]);
    }

    #[test]
    fn unknown_fields_are_reported() {
        let schema = model_schema();
        let issues = schema
            .validate(&json!({"model": "openai:dall-e-3", "extra": "x"}))
            .unwrap_err();
        assert_eq!(issues, vec![ValidationIssue::UnknownField("extra".into())]);
    }
}
