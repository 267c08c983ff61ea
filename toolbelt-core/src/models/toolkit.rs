// toolbelt-core/src/models/toolkit.rs

//! Toolkit identity, definitions, and the caller-owned selection list.

use crate::schema::ParameterSchema;
use crate::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Identifier of a known toolkit. Serializes to its kebab-case string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolkitId {
    Image,
    Filesystem,
}

impl ToolkitId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolkitId::Image => "image",
            ToolkitId::Filesystem => "filesystem",
        }
    }
}

impl fmt::Display for ToolkitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown toolkit id '{0}'")]
pub struct UnknownToolkitId(pub String);

impl FromStr for ToolkitId {
    type Err = UnknownToolkitId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(ToolkitId::Image),
            "filesystem" => Ok(ToolkitId::Filesystem),
            other => Err(UnknownToolkitId(other.to_string())),
        }
    }
}

/// A field prompt a frontend renders when collecting a configuration draft.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    /// Fixed choices to pick from; empty means free text.
    pub choices: Vec<String>,
}

/// Capability hook: a toolkit that declares configurable parameters supplies
/// a form describing how to populate the draft. Presence is checked, never
/// reflected.
pub trait ParameterForm: Send + Sync {
    fn fields(&self) -> Vec<FormField>;
}

/// Capability hook: a toolkit may intercept how its picker entry behaves,
/// typically to report an asynchronous readiness state before it becomes
/// selectable. The picker defers to the wrapper when one is present.
pub trait EntryWrapper: Send + Sync {
    /// While this returns true the entry is inert (shown as loading).
    fn is_loading(&self) -> bool;
}

/// A toolkit definition: display metadata, a configuration schema, the tools
/// the agent runtime may invoke once the toolkit is selected, and optional
/// UI capability hooks. Built once at registry construction; never mutated.
pub struct ToolkitDefinition {
    pub name: String,
    pub description: String,
    pub icon: &'static str,
    pub parameters: ParameterSchema,
    pub tools: HashMap<String, Arc<dyn Tool>>,
    pub form: Option<Arc<dyn ParameterForm>>,
    pub wrapper: Option<Arc<dyn EntryWrapper>>,
}

impl fmt::Debug for ToolkitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolkitDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("form", &self.form.is_some())
            .field("wrapper", &self.wrapper.is_some())
            .finish()
    }
}

/// An enabled toolkit instance: the identifier, its definition, and a
/// configuration value that satisfied the definition's schema when added
/// (or `{}` for toolkits without parameters).
#[derive(Clone)]
pub struct SelectedToolkit {
    pub id: ToolkitId,
    pub toolkit: Arc<ToolkitDefinition>,
    pub parameters: JsonValue,
}

impl SelectedToolkit {
    /// The form used for parameterless toolkits and pre-selections.
    pub fn with_empty_parameters(id: ToolkitId, toolkit: Arc<ToolkitDefinition>) -> Self {
        Self {
            id,
            toolkit,
            parameters: JsonValue::Object(Map::new()),
        }
    }
}

impl fmt::Debug for SelectedToolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedToolkit")
            .field("id", &self.id)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// The caller-owned list of currently selected toolkits.
///
/// The picker never mutates this directly; it only reports outcomes the
/// owner applies. `add` enforces the at-most-once invariant.
#[derive(Debug, Default)]
pub struct Selection {
    entries: Vec<SelectedToolkit>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ToolkitId) -> bool {
        self.entries.iter().any(|t| t.id == id)
    }

    /// Add a selected toolkit. Returns false (and changes nothing) if the
    /// identifier is already present.
    pub fn add(&mut self, toolkit: SelectedToolkit) -> bool {
        if self.contains(toolkit.id) {
            return false;
        }
        self.entries.push(toolkit);
        true
    }

    /// Remove by identifier. Idempotent; returns whether an entry was removed.
    pub fn remove(&mut self, id: ToolkitId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t.id != id);
        before != self.entries.len()
    }

    pub fn get(&self, id: ToolkitId) -> Option<&SelectedToolkit> {
        self.entries.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedToolkit> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
