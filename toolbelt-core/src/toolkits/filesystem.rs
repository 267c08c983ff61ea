// toolbelt-core/src/toolkits/filesystem.rs

//! The filesystem toolkit: read-only file access with no configurable
//! parameters, so the picker enables it without opening a dialog.

use crate::models::toolkit::ToolkitDefinition;
use crate::models::tools::{ToolDefinition, ToolInput, ToolParameter, ToolParametersDefinition};
use crate::schema::ParameterSchema;
use crate::{async_trait, Tool};
use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub const READ_FILE_TOOL: &str = "read_file";
pub const LIST_DIRECTORY_TOOL: &str = "list_directory";

pub fn filesystem_toolkit() -> ToolkitDefinition {
    let mut tools: HashMap<String, Arc<dyn Tool>> = HashMap::new();
    tools.insert(READ_FILE_TOOL.to_string(), Arc::new(ReadFileTool));
    tools.insert(LIST_DIRECTORY_TOOL.to_string(), Arc::new(ListDirectoryTool));

    ToolkitDefinition {
        name: "Filesystem".to_string(),
        description: "Read files and list directories in the workspace".to_string(),
        icon: "📁",
        parameters: ParameterSchema::empty(),
        tools,
        form: None,
        wrapper: None,
    }
}

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> ToolDefinition {
        let mut properties = HashMap::new();
        properties.insert(
            "path".to_string(),
            ToolParameter::string("Path of the file to read, relative to the working directory"),
        );
        ToolDefinition {
            name: READ_FILE_TOOL.to_string(),
            description: "Read the contents of a file".to_string(),
            parameters: ToolParametersDefinition::object(properties, vec!["path".to_string()]),
        }
    }

    async fn invoke(&self, _parameters: &JsonValue, input: ToolInput) -> Result<String> {
        let path = input.require_str("path")?;
        info!(path, "reading file");
        fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path))
    }
}

pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    fn definition(&self) -> ToolDefinition {
        let mut properties = HashMap::new();
        properties.insert(
            "path".to_string(),
            ToolParameter::string("Directory to list, relative to the working directory"),
        );
        properties.insert(
            "show_hidden".to_string(),
            ToolParameter::boolean("Include entries whose names start with a dot"),
        );
        ToolDefinition {
            name: LIST_DIRECTORY_TOOL.to_string(),
            description: "List the entries of a directory with their type and size".to_string(),
            parameters: ToolParametersDefinition::object(properties, vec!["path".to_string()]),
        }
    }

    async fn invoke(&self, _parameters: &JsonValue, input: ToolInput) -> Result<String> {
        let path = input.require_str("path")?;
        let show_hidden = input.get_bool("show_hidden").unwrap_or(false);
        info!(path, show_hidden, "listing directory");
        list_directory(Path::new(path), show_hidden)
    }
}

fn list_directory(path: &Path, show_hidden: bool) -> Result<String> {
    if !path.is_dir() {
        return Err(anyhow!("not a directory: {}", path.display()));
    }

    let mut lines = Vec::new();
    let entries = fs::read_dir(path)
        .with_context(|| format!("failed to read directory: {}", path.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", path.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        let metadata = entry
            .metadata()
            .with_context(|| format!("failed to read metadata for {}", name))?;
        if metadata.is_dir() {
            lines.push(format!("{}/", name));
        } else {
            lines.push(format!("{} ({} bytes)", name, metadata.len()));
        }
    }
    lines.sort();
    Ok(lines.join("\n"))
}
