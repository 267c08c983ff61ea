// toolbelt-core/src/toolkits/image.rs

//! The image generation toolkit.
//!
//! Its single configurable parameter, `model`, is enumerated over the
//! qualified ids of the model catalog at construction time. Building the
//! schema over an empty catalog fails, so the toolkit never registers in a
//! state where it would accept arbitrary model strings.

use crate::config::ImageConfig;
use crate::errors::SchemaError;
use crate::models::toolkit::{FormField, ParameterForm, ToolkitDefinition};
use crate::models::tools::{ToolDefinition, ToolInput, ToolParameter, ToolParametersDefinition};
use crate::schema::{ParameterField, ParameterSchema};
use crate::{async_trait, Tool};
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub const GENERATE_TOOL: &str = "generate_image";

const IMAGE_SIZES: [&str; 3] = ["1024x1024", "1792x1024", "1024x1792"];

/// Build the image toolkit over the given settings.
pub fn image_toolkit(config: &ImageConfig) -> Result<ToolkitDefinition, SchemaError> {
    let catalog = config.catalog();
    let model_ids = catalog.qualified_ids();

    let parameters = ParameterSchema::new(vec![ParameterField::enumeration(
        "model",
        "Model used for image generation",
        true,
        model_ids.clone(),
    )?])?;

    let generate: Arc<dyn Tool> = Arc::new(GenerateImageTool::new(
        config.endpoint().to_string(),
        config.api_key_env_var().to_string(),
    ));

    let mut tools: HashMap<String, Arc<dyn Tool>> = HashMap::new();
    tools.insert(GENERATE_TOOL.to_string(), generate);

    Ok(ToolkitDefinition {
        name: "Image".to_string(),
        description: "Generate images from text prompts".to_string(),
        icon: "🖼",
        parameters,
        tools,
        form: Some(Arc::new(ImageForm { model_ids })),
        wrapper: None,
    })
}

/// Form capability for the image toolkit: one select over the catalog.
struct ImageForm {
    model_ids: Vec<String>,
}

impl ParameterForm for ImageForm {
    fn fields(&self) -> Vec<FormField> {
        vec![FormField {
            name: "model".to_string(),
            label: "Image model".to_string(),
            choices: self.model_ids.clone(),
        }]
    }
}

/// Posts a generation request to an OpenAI-images-compatible endpoint.
///
/// The model comes from the selected toolkit's configuration, the prompt
/// from the tool input. The API key is read from the configured environment
/// variable at invocation time.
pub struct GenerateImageTool {
    http_client: reqwest::Client,
    endpoint: String,
    api_key_env_var: String,
}

impl GenerateImageTool {
    pub fn new(endpoint: String, api_key_env_var: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint,
            api_key_env_var,
        }
    }
}

#[async_trait]
impl Tool for GenerateImageTool {
    fn definition(&self) -> ToolDefinition {
        let mut properties = HashMap::new();
        properties.insert(
            "prompt".to_string(),
            ToolParameter::string("Text description of the image to generate"),
        );
        properties.insert(
            "size".to_string(),
            ToolParameter::enumeration(
                "Output dimensions (defaults to 1024x1024)",
                IMAGE_SIZES.iter().map(|s| s.to_string()).collect(),
            ),
        );
        ToolDefinition {
            name: GENERATE_TOOL.to_string(),
            description: "Generate an image from a text prompt using the configured model"
                .to_string(),
            parameters: ToolParametersDefinition::object(properties, vec!["prompt".to_string()]),
        }
    }

    async fn invoke(&self, parameters: &JsonValue, input: ToolInput) -> Result<String> {
        let qualified_model = parameters
            .get("model")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| anyhow!("image toolkit parameters are missing 'model'"))?;
        // The endpoint wants the bare model id, without the provider prefix.
        let model = qualified_model
            .split_once(':')
            .map(|(_, model)| model)
            .unwrap_or(qualified_model);

        let prompt = input.require_str("prompt")?;
        let size = input.get_str("size").unwrap_or("1024x1024");

        let api_key = std::env::var(&self.api_key_env_var).with_context(|| {
            format!(
                "environment variable '{}' is not set",
                self.api_key_env_var
            )
        })?;

        let payload = json!({
            "model": model,
            "prompt": prompt,
            "n": 1,
            "size": size,
        });

        info!(model = qualified_model, size, "requesting image generation");
        debug!(endpoint = %self.endpoint, "posting generation payload");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .context("failed to send image generation request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read image generation response")?;

        if !status.is_success() {
            return Err(anyhow!(
                "image generation failed with status {}: {}",
                status,
                body
            ));
        }

        let parsed: JsonValue =
            serde_json::from_str(&body).context("image generation response was not JSON")?;
        let first = parsed
            .get("data")
            .and_then(|d| d.get(0))
            .ok_or_else(|| anyhow!("image generation response had no data entries"))?;

        if let Some(url) = first.get("url").and_then(JsonValue::as_str) {
            Ok(url.to_string())
        } else if let Some(b64) = first.get("b64_json").and_then(JsonValue::as_str) {
            Ok(format!("data:image/png;base64,{}", b64))
        } else {
            Err(anyhow!(
                "image generation response entry had neither 'url' nor 'b64_json'"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolbeltConfig;
    use httpmock::prelude::*;

    #[test]
    fn toolkit_requires_exactly_a_model_field() {
        let toolkit = image_toolkit(&ImageConfig::default()).unwrap();
        assert!(!toolkit.parameters.is_empty());
        assert!(toolkit
            .parameters
            .validate(&json!({"model": "openai:dall-e-3"}))
            .is_ok());
        assert!(toolkit.parameters.validate(&json!({})).is_err());
        assert!(toolkit
            .parameters
            .validate(&json!({"model": "openai:not-in-catalog"}))
            .is_err());
    }

    #[test]
    fn toolkit_form_offers_the_catalog() {
        let toml = r#"
            [[image.models]]
            provider = "openai"
            model = "dall-e-3"
        "#;
        let config = ToolbeltConfig::from_toml_str(toml).unwrap();
        let toolkit = image_toolkit(&config.image).unwrap();
        let form = toolkit.form.as_ref().expect("image toolkit declares a form");
        let fields = form.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "model");
        assert_eq!(fields[0].choices, vec!["openai:dall-e-3"]);
    }

    #[tokio::test]
    async fn generate_posts_model_and_prompt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/images/generations")
                    .header("authorization", "Bearer test-image-key")
                    .json_body_partial(r#"{"model": "dall-e-3", "prompt": "a lighthouse"}"#);
                then.status(200).json_body(json!({
                    "data": [{"url": "https://img.example/1.png"}]
                }));
            })
            .await;

        std::env::set_var("TOOLBELT_TEST_IMAGE_KEY", "test-image-key");
        let tool = GenerateImageTool::new(
            server.url("/v1/images/generations"),
            "TOOLBELT_TEST_IMAGE_KEY".to_string(),
        );

        let input =
            ToolInput::from_value(json!({"prompt": "a lighthouse"})).unwrap();
        let result = tool
            .invoke(&json!({"model": "openai:dall-e-3"}), input)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "https://img.example/1.png");
    }

    #[tokio::test]
    async fn generate_surfaces_api_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(400).body("bad prompt");
            })
            .await;

        std::env::set_var("TOOLBELT_TEST_IMAGE_KEY_ERR", "k");
        let tool = GenerateImageTool::new(
            server.url("/v1/images/generations"),
            "TOOLBELT_TEST_IMAGE_KEY_ERR".to_string(),
        );

        let input = ToolInput::from_value(json!({"prompt": "x"})).unwrap();
        let err = tool
            .invoke(&json!({"model": "openai:dall-e-3"}), input)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("status 400"));
    }
}
