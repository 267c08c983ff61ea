// toolbelt-core/src/catalog.rs

//! The image model catalog: the closed set of models the image toolkit's
//! `model` parameter may name. Qualified ids take the form
//! `<provider>:<model_id>`.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// One available image model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageModel {
    pub provider: String,
    pub model_id: String,
}

impl ImageModel {
    pub fn new(provider: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model_id: model_id.into(),
        }
    }

    /// The `<provider>:<model_id>` form used in parameter schemas.
    pub fn qualified_id(&self) -> String {
        format!("{}:{}", self.provider, self.model_id)
    }
}

lazy_static! {
    /// Models offered when the config file does not declare its own catalog.
    pub static ref DEFAULT_IMAGE_MODELS: Vec<ImageModel> = vec![
        ImageModel::new("openai", "dall-e-3"),
        ImageModel::new("openai", "dall-e-2"),
        ImageModel::new("openai", "gpt-image-1"),
        ImageModel::new("xai", "grok-2-image"),
    ];
}

/// An ordered, read-only sequence of available image models.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<ImageModel>,
}

impl ModelCatalog {
    pub fn new(models: Vec<ImageModel>) -> Self {
        Self { models }
    }

    pub fn default_models() -> Self {
        Self::new(DEFAULT_IMAGE_MODELS.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageModel> {
        self.models.iter()
    }

    /// Qualified ids in catalog order; the enumeration for the `model` field.
    pub fn qualified_ids(&self) -> Vec<String> {
        self.models.iter().map(ImageModel::qualified_id).collect()
    }

    pub fn contains(&self, qualified_id: &str) -> bool {
        self.models.iter().any(|m| m.qualified_id() == qualified_id)
    }
}
