//! Blocks: placed block configuration, custom (content) blocks and their
//! types.
//!
//! - [`Block`] - a block placed in a theme region (config entity)
//! - [`CustomBlock`] - user-authored block content (content entity)
//! - [`CustomBlockType`] - bundle of custom blocks (config entity)

mod custom;

pub use custom::{CUSTOM_BLOCK_PLUGIN_PREFIX, CustomBlock, CustomBlockType};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::CmsError;
use crate::entity::{ConfigEntity, Entity, FormValues};

/// Label display setting that shows the block title.
pub const BLOCK_LABEL_VISIBLE: &str = "visible";

/// A block placed in a theme region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: Option<String>,
    pub label: String,
    /// Block plugin id, e.g. `system_main_block` or `custom_block:<uuid>`.
    pub plugin: String,
    pub theme: String,
    pub region: String,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub settings: Map<String, Value>,
    /// Visibility conditions keyed by condition id.
    #[serde(default)]
    pub visibility: Map<String, Value>,
    #[serde(default = "default_label_display")]
    pub label_display: String,
    #[serde(default = "default_langcode")]
    pub langcode: String,
    #[serde(default = "default_status")]
    pub status: bool,
}

fn default_label_display() -> String {
    BLOCK_LABEL_VISIBLE.to_string()
}

fn default_langcode() -> String {
    "en".to_string()
}

fn default_status() -> bool {
    true
}

impl Block {
    /// An unsaved block for `plugin` in `region` of `theme`.
    pub fn new(plugin: impl Into<String>, theme: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: None,
            label: String::new(),
            plugin: plugin.into(),
            theme: theme.into(),
            region: region.into(),
            weight: 0,
            settings: Map::new(),
            visibility: Map::new(),
            label_display: default_label_display(),
            langcode: default_langcode(),
            status: true,
        }
    }

    /// Set the id (builder style).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn set_region(&mut self, region: impl Into<String>) {
        self.region = region.into();
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: i64) {
        self.weight = weight;
    }

    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    pub fn visibility(&self) -> &Map<String, Value> {
        &self.visibility
    }

    /// Whether the block title is shown.
    pub fn is_label_visible(&self) -> bool {
        self.label_display == BLOCK_LABEL_VISIBLE
    }
}

impl Entity for Block {
    fn entity_type(&self) -> &str {
        "block"
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> Option<String> {
        Some(self.label.clone()).filter(|label| !label.is_empty())
    }

    fn langcode(&self) -> &str {
        &self.langcode
    }

    fn apply_form_values(&mut self, values: &FormValues, _langcode: &str) -> Result<(), CmsError> {
        if let Some(value) = values.get("label") {
            self.label = string_value("label", value)?;
        }
        if let Some(value) = values.get("region") {
            self.region = string_value("region", value)?;
        }
        if let Some(value) = values.get("weight") {
            self.weight = value.as_i64().ok_or_else(|| CmsError::InvalidFormState {
                reason: "weight must be an integer".to_string(),
            })?;
        }
        if let Some(value) = values.get("label_display") {
            self.label_display = string_value("label_display", value)?;
        }
        if let Some(Value::Object(settings)) = values.get("settings") {
            self.settings.extend(settings.clone());
        }
        Ok(())
    }
}

impl ConfigEntity for Block {
    fn status(&self) -> bool {
        self.status
    }

    fn set_status(&mut self, status: bool) {
        self.status = status;
    }
}

pub(crate) fn string_value(name: &str, value: &Value) -> Result<String, CmsError> {
    value.as_str().map(str::to_string).ok_or_else(|| CmsError::InvalidFormState {
        reason: format!("{name} must be a string"),
    })
}
