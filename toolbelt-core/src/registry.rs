// toolbelt-core/src/registry.rs

//! The read-only toolkit registry.

use crate::models::toolkit::{ToolkitDefinition, ToolkitId};
use std::sync::Arc;

/// An ordered mapping from toolkit identifier to definition.
///
/// Built once at startup; consumers only iterate entries (in registration
/// order) and look definitions up by identifier. Lookups may miss; callers
/// must not assume an identifier always resolves.
#[derive(Debug, Default)]
pub struct ToolkitRegistry {
    entries: Vec<(ToolkitId, Arc<ToolkitDefinition>)>,
}

impl ToolkitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a toolkit. Registering an identifier twice replaces the
    /// definition in place, keeping the original position.
    pub fn register(&mut self, id: ToolkitId, definition: ToolkitDefinition) {
        let definition = Arc::new(definition);
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            slot.1 = definition;
        } else {
            self.entries.push((id, definition));
        }
    }

    pub fn get(&self, id: ToolkitId) -> Option<&Arc<ToolkitDefinition>> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, definition)| definition)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ToolkitId, &Arc<ToolkitDefinition>)> {
        self.entries.iter().map(|(id, definition)| (*id, definition))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
