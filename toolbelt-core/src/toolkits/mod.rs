// toolbelt-core/src/toolkits/mod.rs

//! Built-in toolkit definitions.

pub mod filesystem;
pub mod image;

use crate::config::ToolbeltConfig;
use crate::errors::SchemaError;
use crate::models::toolkit::ToolkitId;
use crate::registry::ToolkitRegistry;

/// Build the registry of built-in toolkits.
///
/// Fails if any toolkit's schema cannot be constructed (e.g. an image model
/// catalog with no entries), so a misconfigured toolkit never registers.
pub fn builtin_registry(config: &ToolbeltConfig) -> Result<ToolkitRegistry, SchemaError> {
    let mut registry = ToolkitRegistry::new();
    registry.register(ToolkitId::Image, image::image_toolkit(&config.image)?);
    registry.register(ToolkitId::Filesystem, filesystem::filesystem_toolkit());
    Ok(registry)
}
