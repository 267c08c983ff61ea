// toolbelt-core/src/models/tools.rs
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

// --- Structs describing an invocable tool to the agent runtime ---

/// Defines the schema for a tool carried inside a toolkit.
///
/// These definitions travel unchanged inside a selected toolkit; the agent
/// runtime presents them to the model and calls the tool back by name.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ToolParametersDefinition,
}

/// Defines the input parameter structure for a tool.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolParametersDefinition {
    #[serde(rename = "type")]
    pub param_type: String,
    pub properties: HashMap<String, ToolParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ToolParametersDefinition {
    /// An object definition with the given properties and required names.
    pub fn object(
        properties: HashMap<String, ToolParameter>,
        required: Vec<String>,
    ) -> Self {
        Self {
            param_type: "object".to_string(),
            properties,
            required,
        }
    }

    /// An object definition with no properties at all.
    pub fn empty() -> Self {
        Self::object(HashMap::new(), Vec::new())
    }
}

/// A single input parameter within a tool's schema.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolParameter {
    #[serde(rename = "type")]
    pub param_type: ToolParameterType,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl ToolParameter {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            param_type: ToolParameterType::String,
            description: description.into(),
            enum_values: None,
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self {
            param_type: ToolParameterType::Integer,
            description: description.into(),
            enum_values: None,
        }
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self {
            param_type: ToolParameterType::Boolean,
            description: description.into(),
            enum_values: None,
        }
    }

    /// A string parameter restricted to a fixed set of values.
    pub fn enumeration(description: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            param_type: ToolParameterType::String,
            description: description.into(),
            enum_values: Some(values),
        }
    }
}

/// The type of a tool input parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ToolParameterType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// The input arguments supplied for one tool invocation.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ToolInput {
    pub arguments: HashMap<String, JsonValue>,
}

impl ToolInput {
    pub fn from_value(value: JsonValue) -> anyhow::Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self {
                arguments: map.into_iter().collect(),
            }),
            JsonValue::Null => Ok(Self::default()),
            other => Err(anyhow::anyhow!(
                "tool input must be a JSON object, got: {}",
                other
            )),
        }
    }

    /// Fetch a required string argument.
    pub fn require_str(&self, name: &str) -> anyhow::Result<&str> {
        self.arguments
            .get(name)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| anyhow::anyhow!("missing required string argument '{}'", name))
    }

    /// Fetch an optional string argument.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(JsonValue::as_str)
    }

    /// Fetch an optional boolean argument.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.arguments.get(name).and_then(JsonValue::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_input_from_object() {
        let input = ToolInput::from_value(json!({"path": "src/lib.rs", "hidden": true})).unwrap();
        assert_eq!(input.require_str("path").unwrap(), "src/lib.rs");
        assert_eq!(input.get_bool("hidden"), Some(true));
        assert!(input.require_str("missing").is_err());
    }

    #[test]
    fn tool_input_rejects_non_object() {
        assert!(ToolInput::from_value(json!("just a string")).is_err());
        assert!(ToolInput::from_value(json!(null)).is_ok());
    }

    #[test]
    fn enum_parameter_serializes_enum_key() {
        let param = ToolParameter::enumeration("a choice", vec!["a".into(), "b".into()]);
        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["enum"], json!(["a", "b"]));
        assert_eq!(value["type"], "string");
    }
}
