//! Entity interfaces consumed by forms, blocks and field formatters.
//!
//! Only the shape of the calls made into the entity system is modelled:
//! identity (type, bundle, id), language and translations, per-field
//! validation, and applying submitted form values to a copy.

mod form;

pub use form::{
    ButtonType, EntityForm, EntityFormController, EntityFormHandler, FormAction, FormState, FormStep, NoopFormHandler,
    INTERNAL_FORM_VALUES,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::CmsError;

/// Submitted form values keyed by element name.
pub type FormValues = BTreeMap<String, serde_json::Value>;

/// Violations keyed by field name.
pub type FieldViolations = BTreeMap<String, Vec<Violation>>;

/// A failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Field the violation belongs to.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A stored object with an entity type, bundle and language.
///
/// Entities are values: forms edit a clone and only replace the original
/// once a submission has been fully built.
pub trait Entity: Clone + Send + Sync {
    /// Entity type id, e.g. `node`.
    fn entity_type(&self) -> &str;

    /// Bundle; equals the entity type for entities without bundles.
    fn bundle(&self) -> &str {
        self.entity_type()
    }

    /// Id, `None` until the entity is saved.
    fn id(&self) -> Option<&str>;

    /// Whether the entity has never been saved.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Human-readable label.
    fn label(&self) -> Option<String> {
        None
    }

    /// Language of the untranslated entity.
    fn langcode(&self) -> &str;

    /// Languages the entity has a translation for, its own included.
    fn translation_languages(&self) -> BTreeSet<String> {
        BTreeSet::from([self.langcode().to_string()])
    }

    /// Whether a translation exists for `langcode`.
    fn has_translation(&self, langcode: &str) -> bool {
        self.translation_languages().contains(langcode)
    }

    /// The translation for `langcode`, if any.
    fn translation(&self, langcode: &str) -> Option<Self> {
        self.has_translation(langcode).then(|| self.clone())
    }

    /// Run the field constraints.
    fn validate_fields(&self) -> FieldViolations {
        FieldViolations::new()
    }

    /// Copy submitted `values` onto the entity in language `langcode`.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// [`CmsError::InvalidFormState`] when a known value has the wrong shape.
    fn apply_form_values(&mut self, values: &FormValues, langcode: &str) -> Result<(), CmsError>;
}

/// Content entities are revisionable.
pub trait ContentEntity: Entity {
    /// Log message of the current revision.
    fn revision_log(&self) -> Option<&str>;

    /// Set the revision log message.
    fn set_revision_log(&mut self, log: impl Into<String>);
}

/// Configuration entities can be enabled and disabled.
pub trait ConfigEntity: Entity {
    /// Whether the entity is enabled.
    fn status(&self) -> bool;

    /// Enable or disable the entity.
    fn set_status(&mut self, status: bool);
}

/// Entities tracking their last modification.
pub trait EntityChanged: Entity {
    /// When the entity last changed.
    fn changed_time(&self) -> DateTime<Utc>;
}

/// Site language setup used to pick the form language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageContext {
    /// Site default language; new entities start in it.
    pub default_langcode: String,
    /// Language content is currently displayed in.
    pub current_content_langcode: Option<String>,
    /// Whether more than one language is configured.
    pub multilingual: bool,
    /// Candidates tried in order when the current language has no translation.
    pub fallback_candidates: Vec<String>,
}

impl Default for LanguageContext {
    fn default() -> Self {
        Self::monolingual("en")
    }
}

impl LanguageContext {
    /// A single-language site.
    pub fn monolingual(langcode: impl Into<String>) -> Self {
        let langcode = langcode.into();
        Self {
            current_content_langcode: Some(langcode.clone()),
            default_langcode: langcode,
            multilingual: false,
            fallback_candidates: Vec::new(),
        }
    }

    /// A multilingual site currently showing `current`.
    pub fn multilingual<I, S>(default: impl Into<String>, current: impl Into<String>, fallback: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_langcode: default.into(),
            current_content_langcode: Some(current.into()),
            multilingual: true,
            fallback_candidates: fallback.into_iter().map(Into::into).collect(),
        }
    }
}
