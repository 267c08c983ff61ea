// toolbelt-core/src/dialog.rs

//! The configuration dialog: a local draft edited until it satisfies the
//! toolkit's parameter schema.

use crate::errors::DialogError;
use crate::models::toolkit::{ParameterForm, SelectedToolkit, ToolkitDefinition, ToolkitId};
use crate::schema::ValidationIssue;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::debug;

/// Dialog state for configuring one toolkit before it is enabled.
///
/// The draft starts empty and is revalidated on every change; a frontend
/// keeps its submit control enabled exactly while [`ConfigDialog::can_submit`]
/// holds. A failed submit never discards the draft.
#[derive(Debug)]
pub struct ConfigDialog {
    id: ToolkitId,
    toolkit: Arc<ToolkitDefinition>,
    draft: JsonValue,
}

impl ConfigDialog {
    pub(crate) fn new(id: ToolkitId, toolkit: Arc<ToolkitDefinition>) -> Self {
        Self {
            id,
            toolkit,
            draft: JsonValue::Object(Map::new()),
        }
    }

    pub fn id(&self) -> ToolkitId {
        self.id
    }

    pub fn toolkit(&self) -> &Arc<ToolkitDefinition> {
        &self.toolkit
    }

    /// The toolkit's form capability, if it declares one. Toolkits with a
    /// non-empty schema are expected to: without a form the user has no way
    /// to populate required fields.
    pub fn form(&self) -> Option<&dyn ParameterForm> {
        self.toolkit.form.as_deref()
    }

    pub fn draft(&self) -> &JsonValue {
        &self.draft
    }

    /// Set one draft field. Unsetting is done with [`ConfigDialog::clear_field`].
    pub fn set_field(&mut self, name: &str, value: JsonValue) {
        if let JsonValue::Object(map) = &mut self.draft {
            map.insert(name.to_string(), value);
        }
        debug!(toolkit = %self.id, field = name, valid = self.can_submit(), "draft updated");
    }

    pub fn clear_field(&mut self, name: &str) {
        if let JsonValue::Object(map) = &mut self.draft {
            map.remove(name);
        }
    }

    /// Whether the current draft satisfies the toolkit schema.
    pub fn can_submit(&self) -> bool {
        self.toolkit.parameters.validate(&self.draft).is_ok()
    }

    /// The reasons the current draft fails validation; empty when valid.
    pub fn validation_issues(&self) -> Vec<ValidationIssue> {
        self.toolkit
            .parameters
            .validate(&self.draft)
            .err()
            .unwrap_or_default()
    }

    /// Finalize the selection. Fails (keeping the dialog and its draft
    /// intact) if the draft does not satisfy the schema, so no partial or
    /// invalid configuration can ever be produced.
    pub fn submit(&self) -> Result<SelectedToolkit, DialogError> {
        match self.toolkit.parameters.validate(&self.draft) {
            Ok(()) => Ok(SelectedToolkit {
                id: self.id,
                toolkit: self.toolkit.clone(),
                parameters: self.draft.clone(),
            }),
            Err(issues) => Err(DialogError::InvalidDraft(issues)),
        }
    }

    /// Discard the draft and close without side effects.
    pub fn cancel(self) {
        debug!(toolkit = %self.id, "configuration cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ParameterField, ParameterSchema};
    use serde_json::json;
    use std::collections::HashMap;

    fn configurable_toolkit() -> Arc<ToolkitDefinition> {
        let parameters = ParameterSchema::new(vec![ParameterField::enumeration(
            "model",
            "Image model",
            true,
            vec!["openai:dall-e-3".into()],
        )
        .unwrap()])
        .unwrap();
        Arc::new(ToolkitDefinition {
            name: "Image".into(),
            description: String::new(),
            icon: "*",
            parameters,
            tools: HashMap::new(),
            form: None,
            wrapper: None,
        })
    }

    #[test]
    fn fresh_dialog_has_empty_invalid_draft() {
        let dialog = ConfigDialog::new(ToolkitId::Image, configurable_toolkit());
        assert_eq!(dialog.draft(), &json!({}));
        assert!(!dialog.can_submit());
        assert!(dialog.submit().is_err());
    }

    #[test]
    fn valid_draft_enables_submission() {
        let mut dialog = ConfigDialog::new(ToolkitId::Image, configurable_toolkit());
        dialog.set_field("model", json!("openai:dall-e-3"));
        assert!(dialog.can_submit());
        let selected = dialog.submit().unwrap();
        assert_eq!(selected.id, ToolkitId::Image);
        assert_eq!(selected.parameters, json!({"model": "openai:dall-e-3"}));
    }

    #[test]
    fn failed_submit_keeps_the_draft() {
        let mut dialog = ConfigDialog::new(ToolkitId::Image, configurable_toolkit());
        dialog.set_field("model", json!("openai:nonexistent"));
        assert!(dialog.submit().is_err());
        // The user may keep editing from where they left off.
        assert_eq!(dialog.draft(), &json!({"model": "openai:nonexistent"}));
        dialog.set_field("model", json!("openai:dall-e-3"));
        assert!(dialog.submit().is_ok());
    }

    #[test]
    fn clearing_a_field_invalidates_the_draft() {
        let mut dialog = ConfigDialog::new(ToolkitId::Image, configurable_toolkit());
        dialog.set_field("model", json!("openai:dall-e-3"));
        dialog.clear_field("model");
        assert!(!dialog.can_submit());
        assert!(!dialog.validation_issues().is_empty());
    }
}
