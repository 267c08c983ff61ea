// toolbelt-core/src/lib.rs

//! Toolkit selection and configuration for AI chat agents.
//!
//! A toolkit is a named, independently enable-able capability bundle:
//! display metadata, a configuration schema, and one or more invocable
//! tools. This crate provides the read-only [`registry::ToolkitRegistry`],
//! the [`picker::Picker`] that filters and toggles entries against a
//! caller-owned [`Selection`], and the [`dialog::ConfigDialog`] that guards
//! enabling a toolkit behind schema validation of its configuration draft.

pub mod catalog;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod models;
pub mod picker;
pub mod registry;
pub mod schema;
pub mod toolkits;

#[cfg(test)]
mod picker_tests;

use anyhow::Result;
use serde_json::Value as JsonValue;

pub use async_trait::async_trait;

pub use config::ToolbeltConfig;
pub use dialog::ConfigDialog;
pub use errors::{DialogError, SchemaError};
pub use models::toolkit::{
    EntryWrapper, FormField, ParameterForm, SelectedToolkit, Selection, ToolkitDefinition,
    ToolkitId,
};
pub use models::tools::{ToolDefinition, ToolInput};
pub use picker::{Picker, Preselections, ToggleOutcome};
pub use registry::ToolkitRegistry;
pub use toolkits::builtin_registry;

/// Trait for the invocable units bundled within a toolkit.
///
/// The picker never calls these; once a toolkit is selected the surrounding
/// agent runtime invokes them by name, passing the toolkit's validated
/// configuration value alongside the per-call input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The definition presented to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the toolkit's configuration and the call input.
    async fn invoke(&self, parameters: &JsonValue, input: ToolInput) -> Result<String>;
}
