// toolbelt-core/src/config.rs

//! Handles configuration structures and parsing for the toolkit layer.

use crate::catalog::{ImageModel, ModelCatalog};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_IMAGE_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
pub const DEFAULT_IMAGE_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ToolbeltConfig {
    #[serde(default)]
    pub image: ImageConfig,
}

/// Settings for the image toolkit: the model catalog its `model` parameter
/// enumerates, and where its generate tool sends requests.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ImageConfig {
    /// Available image models. When the key is absent entirely, the built-in
    /// default catalog is used; an explicitly empty list is a config error.
    pub models: Option<Vec<ImageModelEntry>>,

    #[serde(default)]
    pub endpoint: Option<String>,

    /// Name of the environment variable holding the API key for the image
    /// endpoint. The key itself never lives in the config file.
    #[serde(default)]
    pub api_key_env_var: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ImageModelEntry {
    pub provider: String,
    pub model: String,
}

impl ToolbeltConfig {
    pub fn from_toml_str(config_toml_content: &str) -> Result<ToolbeltConfig> {
        let config: ToolbeltConfig = match toml::from_str(config_toml_content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse TOML content");
                return Err(anyhow!(e))
                    .context("Failed to parse configuration TOML content. Check TOML syntax.");
            }
        };

        // --- Image Catalog Validation ---
        if let Some(models) = &config.image.models {
            if models.is_empty() {
                return Err(anyhow!(
                    "[image] 'models' is empty. Declare at least one [[image.models]] entry or remove the key to use the defaults."
                ));
            }
            let mut seen = Vec::new();
            for entry in models {
                if entry.provider.trim().is_empty() {
                    return Err(anyhow!("[[image.models]] entry has an empty 'provider'."));
                }
                if entry.model.trim().is_empty() {
                    return Err(anyhow!("[[image.models]] entry has an empty 'model'."));
                }
                let qualified = format!("{}:{}", entry.provider, entry.model);
                if seen.contains(&qualified) {
                    return Err(anyhow!("Duplicate image model '{}' in config.", qualified));
                }
                seen.push(qualified);
            }
        }

        if let Some(endpoint) = &config.image.endpoint {
            if endpoint.trim().is_empty() {
                return Err(anyhow!("[image] has an empty 'endpoint'."));
            }
        }
        if let Some(var) = &config.image.api_key_env_var {
            if var.trim().is_empty() {
                return Err(anyhow!("[image] has an empty 'api_key_env_var'."));
            }
        }

        Ok(config)
    }
}

impl ImageConfig {
    /// The catalog the image toolkit's schema is built over.
    pub fn catalog(&self) -> ModelCatalog {
        match &self.models {
            Some(models) => ModelCatalog::new(
                models
                    .iter()
                    .map(|m| ImageModel::new(m.provider.clone(), m.model.clone()))
                    .collect(),
            ),
            None => ModelCatalog::default_models(),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_IMAGE_ENDPOINT)
    }

    pub fn api_key_env_var(&self) -> &str {
        self.api_key_env_var
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_API_KEY_ENV_VAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_default_catalog() {
        let config = ToolbeltConfig::from_toml_str("").unwrap();
        let catalog = config.image.catalog();
        assert!(!catalog.is_empty());
        assert!(catalog.contains("openai:dall-e-3"));
        assert_eq!(config.image.endpoint(), DEFAULT_IMAGE_ENDPOINT);
        assert_eq!(config.image.api_key_env_var(), DEFAULT_IMAGE_API_KEY_ENV_VAR);
    }

    #[test]
    fn declared_models_replace_defaults_in_order() {
        let toml = r#"
            [[image.models]]
            provider = "xai"
            model = "grok-2-image"

            [[image.models]]
            provider = "openai"
            model = "dall-e-2"
        "#;
        let config = ToolbeltConfig::from_toml_str(toml).unwrap();
        assert_eq!(
            config.image.catalog().qualified_ids(),
            vec!["xai:grok-2-image", "openai:dall-e-2"]
        );
    }

    #[test]
    fn explicitly_empty_catalog_is_rejected() {
        let toml = "[image]\nmodels = []\n";
        let err = ToolbeltConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("'models' is empty"));
    }

    #[test]
    fn blank_provider_is_rejected() {
        let toml = r#"
            [[image.models]]
            provider = ""
            model = "dall-e-3"
        "#;
        assert!(ToolbeltConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn duplicate_models_are_rejected() {
        let toml = r#"
            [[image.models]]
            provider = "openai"
            model = "dall-e-3"

            [[image.models]]
            provider = "openai"
            model = "dall-e-3"
        "#;
        let err = ToolbeltConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("Duplicate image model"));
    }

    #[test]
    fn invalid_toml_syntax_fails_with_context() {
        assert!(ToolbeltConfig::from_toml_str("[image\nmodels=").is_err());
    }
}
