//! Custom blocks and custom block types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Block, string_value};
use crate::core::CmsError;
use crate::entity::{ConfigEntity, ContentEntity, Entity, EntityChanged, FieldViolations, FormValues, Violation};

/// Prefix of the block plugin id that places a custom block.
pub const CUSTOM_BLOCK_PLUGIN_PREFIX: &str = "custom_block:";

/// User-authored block content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBlock {
    pub id: Option<String>,
    pub uuid: String,
    /// Bundle: the id of the [`CustomBlockType`].
    pub block_type: String,
    /// Administrative description.
    pub info: String,
    pub langcode: String,
    #[serde(default)]
    pub translations: BTreeSet<String>,
    /// Theme the block was created for, if any.
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub revision_log: Option<String>,
    pub changed: DateTime<Utc>,
}

impl CustomBlock {
    /// An unsaved custom block of `block_type`.
    pub fn new(uuid: impl Into<String>, block_type: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            id: None,
            uuid: uuid.into(),
            block_type: block_type.into(),
            info: info.into(),
            langcode: "en".to_string(),
            translations: BTreeSet::new(),
            theme: None,
            revision_log: None,
            changed: Utc::now(),
        }
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = Some(theme.into());
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Block plugin id placing this custom block.
    pub fn plugin_id(&self) -> String {
        format!("{CUSTOM_BLOCK_PLUGIN_PREFIX}{}", self.uuid)
    }

    /// The placed blocks showing this custom block.
    pub fn instances<'a>(&self, blocks: &'a [Block]) -> Vec<&'a Block> {
        let plugin_id = self.plugin_id();
        blocks.iter().filter(|block| block.plugin == plugin_id).collect()
    }
}

impl Entity for CustomBlock {
    fn entity_type(&self) -> &str {
        "custom_block"
    }

    fn bundle(&self) -> &str {
        &self.block_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> Option<String> {
        Some(self.info.clone())
    }

    fn langcode(&self) -> &str {
        &self.langcode
    }

    fn translation_languages(&self) -> BTreeSet<String> {
        let mut languages = self.translations.clone();
        languages.insert(self.langcode.clone());
        languages
    }

    fn validate_fields(&self) -> FieldViolations {
        let mut violations = FieldViolations::new();
        if self.info.trim().is_empty() {
            violations.insert("info".to_string(), vec![Violation::new("info", "Block description field is required.")]);
        }
        violations
    }

    fn apply_form_values(&mut self, values: &FormValues, langcode: &str) -> Result<(), CmsError> {
        if let Some(value) = values.get("info") {
            self.info = string_value("info", value)?;
        }
        if let Some(value) = values.get("revision_log") {
            self.revision_log = Some(string_value("revision_log", value)?);
        }
        if langcode != self.langcode {
            self.translations.insert(langcode.to_string());
        }
        self.changed = Utc::now();
        Ok(())
    }
}

impl ContentEntity for CustomBlock {
    fn revision_log(&self) -> Option<&str> {
        self.revision_log.as_deref()
    }

    fn set_revision_log(&mut self, log: impl Into<String>) {
        self.revision_log = Some(log.into());
    }
}

impl EntityChanged for CustomBlock {
    fn changed_time(&self) -> DateTime<Utc> {
        self.changed
    }
}

/// Bundle of custom blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBlockType {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Whether new blocks of this type create a new revision by default.
    #[serde(default)]
    pub revision: bool,
    #[serde(default = "enabled")]
    pub status: bool,
}

fn enabled() -> bool {
    true
}

impl CustomBlockType {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            revision: false,
            status: true,
        }
    }
}

impl Entity for CustomBlockType {
    fn entity_type(&self) -> &str {
        "custom_block_type"
    }

    fn id(&self) -> Option<&str> {
        Some(self.id.as_str()).filter(|id| !id.is_empty())
    }

    fn label(&self) -> Option<String> {
        Some(self.label.clone())
    }

    fn langcode(&self) -> &str {
        "en"
    }

    fn apply_form_values(&mut self, values: &FormValues, _langcode: &str) -> Result<(), CmsError> {
        if let Some(value) = values.get("label") {
            self.label = string_value("label", value)?;
        }
        if let Some(value) = values.get("description") {
            self.description = string_value("description", value)?;
        }
        if let Some(value) = values.get("revision") {
            self.revision = value.as_bool().ok_or_else(|| CmsError::InvalidFormState {
                reason: "revision must be a boolean".to_string(),
            })?;
        }
        Ok(())
    }
}

impl ConfigEntity for CustomBlockType {
    fn status(&self) -> bool {
        self.status
    }

    fn set_status(&mut self, status: bool) {
        self.status = status;
    }
}
