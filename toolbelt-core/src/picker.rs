// toolbelt-core/src/picker.rs

//! The toolkit picker: filtering the registry, toggling entries against the
//! caller-owned selection, and applying externally supplied pre-selections.

use crate::dialog::ConfigDialog;
use crate::models::toolkit::{SelectedToolkit, Selection, ToolkitDefinition, ToolkitId};
use crate::registry::ToolkitRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Externally supplied pre-selection state, e.g. from a shareable link or
/// repeated CLI flags. Keys are raw identifier strings; only the literal
/// value "true" marks a toolkit for addition.
///
/// Acknowledging clears the whole channel, so a repeated pass over the same
/// (now empty) state adds nothing.
#[derive(Debug, Clone, Default)]
pub struct Preselections {
    entries: BTreeMap<String, String>,
}

impl Preselections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identifier for pre-selection.
    pub fn mark(&mut self, id: impl Into<String>) {
        self.entries.insert(id.into(), "true".to_string());
    }

    /// Set a raw key/value pair, as a query-string-like channel would.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    fn is_marked(&self, key: &str) -> bool {
        self.entries.get(key).map(String::as_str) == Some("true")
    }

    /// Clear the channel after its pre-selections have been applied.
    pub fn acknowledge(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a toggle asks the selection owner to do.
#[derive(Debug)]
pub enum ToggleOutcome {
    /// The toolkit was selected; the owner should remove it.
    Removed(ToolkitId),
    /// The toolkit has no configurable parameters; the owner should add it.
    Added(SelectedToolkit),
    /// The toolkit needs configuration first; the add is deferred until the
    /// returned dialog submits.
    ConfigurationRequired(ConfigDialog),
    /// The toolkit's wrapper reports it is still becoming ready; no change.
    NotReady(ToolkitId),
    /// The identifier does not resolve in the registry; no change.
    UnknownToolkit(ToolkitId),
}

/// Read-only view over the registry driving selection changes.
///
/// The picker holds no selection state of its own: the surrounding session
/// owns the list of selected toolkits and is its sole mutator. Toggles and
/// pre-selection passes only report what should happen.
#[derive(Debug)]
pub struct Picker {
    registry: Arc<ToolkitRegistry>,
    query: String,
}

impl Picker {
    pub fn new(registry: Arc<ToolkitRegistry>) -> Self {
        Self {
            registry,
            query: String::new(),
        }
    }

    pub fn registry(&self) -> &ToolkitRegistry {
        &self.registry
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Registry entries whose display name contains the current query as a
    /// case-insensitive substring, in registry order. The empty query
    /// matches everything; no match yields an empty list, which is the
    /// picker's "nothing found" state rather than an error.
    pub fn filtered(&self) -> Vec<(ToolkitId, Arc<ToolkitDefinition>)> {
        let needle = self.query.to_lowercase();
        self.registry
            .iter()
            .filter(|(_, definition)| {
                needle.is_empty() || definition.name.to_lowercase().contains(&needle)
            })
            .map(|(id, definition)| (id, definition.clone()))
            .collect()
    }

    /// Toggle one entry against the current selection.
    pub fn toggle(&self, id: ToolkitId, selection: &Selection) -> ToggleOutcome {
        let Some(definition) = self.registry.get(id) else {
            debug!(toolkit = %id, "toggle ignored: not in registry");
            return ToggleOutcome::UnknownToolkit(id);
        };

        if selection.contains(id) {
            info!(toolkit = %id, "deselecting toolkit");
            return ToggleOutcome::Removed(id);
        }

        if let Some(wrapper) = &definition.wrapper {
            if wrapper.is_loading() {
                debug!(toolkit = %id, "toggle ignored: entry still loading");
                return ToggleOutcome::NotReady(id);
            }
        }

        if definition.parameters.is_empty() {
            info!(toolkit = %id, "selecting toolkit with empty parameters");
            ToggleOutcome::Added(SelectedToolkit::with_empty_parameters(
                id,
                definition.clone(),
            ))
        } else {
            info!(toolkit = %id, "toolkit requires configuration");
            ToggleOutcome::ConfigurationRequired(ConfigDialog::new(id, definition.clone()))
        }
    }

    /// Apply pending pre-selections: every registry entry marked "true" in
    /// the channel and not already selected becomes a selected toolkit with
    /// empty parameters. When anything was produced the channel is
    /// acknowledged, so re-running against the same state is a no-op.
    ///
    /// Identifiers in the channel that resolve to nothing are silently
    /// ignored. The returned additions are computed against the selection as
    /// it was at the start of the pass; the owner applies them afterwards.
    pub fn apply_preselections(
        &self,
        pending: &mut Preselections,
        selection: &Selection,
    ) -> Vec<SelectedToolkit> {
        let additions: Vec<SelectedToolkit> = self
            .registry
            .iter()
            .filter(|(id, _)| pending.is_marked(id.as_str()) && !selection.contains(*id))
            .map(|(id, definition)| {
                SelectedToolkit::with_empty_parameters(id, definition.clone())
            })
            .collect();

        if !additions.is_empty() {
            for toolkit in &additions {
                info!(toolkit = %toolkit.id, "applying pre-selection");
            }
            pending.acknowledge();
        }

        additions
    }
}
