//! Entity forms.
//!
//! [`EntityFormController`] holds the entity being edited and drives the
//! form lifecycle: build (id, language, actions), validate, submit, save and
//! delete. Submission never mutates the edited entity in place; it builds a
//! fresh copy from the submitted values and swaps it in before any
//! [`EntityFormHandler::submit`] hook runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Entity, FieldViolations, FormValues, LanguageContext};
use crate::core::CmsError;

/// Form API values removed from a submission before it is applied.
pub const INTERNAL_FORM_VALUES: &[&str] = &["op", "form_build_id", "form_token", "form_id"];

/// Operation used when none is set.
pub const DEFAULT_OPERATION: &str = "default";

/// Mutable state of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    /// Language the form edits, once decided.
    pub langcode: Option<String>,
    /// Submitted values.
    pub values: FormValues,
    /// Errors keyed by element name.
    pub errors: BTreeMap<String, String>,
    /// Violations reported by the last validation.
    pub violations: FieldViolations,
    /// Form display in use, `<entity_type>.<bundle>.<operation>`.
    pub form_display: Option<String>,
    /// Whether the controller initialised this state.
    pub initialized: bool,
    /// Whether submit handlers ran.
    pub submitted: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a submitted value (builder style).
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Flag an element as erroneous. The first error for an element wins.
    pub fn set_error(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(name.into()).or_insert_with(|| message.into());
    }

    /// Whether any element has an error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Remove Form API internals from the submitted values.
    pub fn clean_values(&mut self) {
        for key in INTERNAL_FORM_VALUES {
            self.values.remove(*key);
        }
    }
}

/// Styling hint of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    Default,
    Primary,
    Danger,
}

/// A lifecycle step triggered by an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStep {
    Validate,
    Submit,
    Save,
    Delete,
}

/// One button of the form's actions element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAction {
    pub name: String,
    pub label: String,
    pub button_type: ButtonType,
    pub weight: i32,
    /// Steps run before the submit steps; any error stops the submission.
    pub validate: Vec<FormStep>,
    pub submit: Vec<FormStep>,
}

/// The structure a form build produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityForm {
    pub form_id: String,
    pub base_form_id: Option<String>,
    /// Value of the hidden `langcode` element.
    pub langcode: String,
    pub form_display: String,
    pub actions: Vec<FormAction>,
}

/// Hooks around the generic entity form lifecycle.
///
/// Every method defaults to a no-op.
pub trait EntityFormHandler<E: Entity>: Send + Sync {
    /// Called once when the form state is first initialised.
    fn prepare(&mut self, _entity: &mut E, _state: &mut FormState) {}

    /// Additional validation on the built snapshot.
    fn validate(&mut self, _entity: &E, _state: &mut FormState) {}

    /// Runs after the snapshot has replaced the edited entity.
    fn submit(&mut self, _entity: &mut E, _state: &mut FormState) -> Result<(), CmsError> {
        Ok(())
    }

    /// Persist the entity.
    fn save(&mut self, _entity: &mut E, _state: &mut FormState) -> Result<(), CmsError> {
        Ok(())
    }

    /// Delete the entity.
    fn delete(&mut self, _entity: &E, _state: &mut FormState) -> Result<(), CmsError> {
        Ok(())
    }
}

/// Handler with no hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormHandler;

impl<E: Entity> EntityFormHandler<E> for NoopFormHandler {}

/// Generic form for editing one entity.
pub struct EntityFormController<E: Entity> {
    entity: E,
    operation: String,
    languages: LanguageContext,
    handler: Box<dyn EntityFormHandler<E>>,
}

impl<E: Entity> EntityFormController<E> {
    /// A controller for `entity` with the default operation and no hooks.
    pub fn new(entity: E, languages: LanguageContext) -> Self {
        Self {
            entity,
            operation: DEFAULT_OPERATION.to_string(),
            languages,
            handler: Box::new(NoopFormHandler),
        }
    }

    /// Use `handler` for the lifecycle hooks.
    #[must_use]
    pub fn with_handler(mut self, handler: Box<dyn EntityFormHandler<E>>) -> Self {
        self.handler = handler;
        self
    }

    /// Set the operation. `None` or an empty name keeps the current one.
    pub fn set_operation(&mut self, operation: Option<&str>) -> &mut Self {
        if let Some(operation) = operation.filter(|op| !op.is_empty()) {
            self.operation = operation.to_string();
        }
        self
    }

    /// The current operation.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The entity being edited.
    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// Replace the entity being edited.
    pub fn set_entity(&mut self, entity: E) -> &mut Self {
        self.entity = entity;
        self
    }

    /// Consume the controller, returning the edited entity.
    pub fn into_entity(self) -> E {
        self.entity
    }

    /// Form id: `[bundle_]entity_type[_operation]_form`.
    pub fn form_id(&self) -> String {
        let entity_type = self.entity.entity_type();
        let bundle = self.entity.bundle();

        let mut form_id = entity_type.to_string();
        if bundle != entity_type {
            form_id = format!("{bundle}_{form_id}");
        }
        if self.operation != DEFAULT_OPERATION {
            form_id = format!("{form_id}_{}", self.operation);
        }
        format!("{form_id}_form")
    }

    /// `<entity_type>_form`, unless that is already the form id.
    pub fn base_form_id(&self) -> Option<String> {
        let base_form_id = format!("{}_form", self.entity.entity_type());
        (base_form_id != self.form_id()).then_some(base_form_id)
    }

    /// Id of the form display for the current operation.
    pub fn form_display_id(&self) -> String {
        format!("{}.{}.{}", self.entity.entity_type(), self.entity.bundle(), self.operation)
    }

    /// The action buttons.
    ///
    /// `submit` validates, submits and saves; `delete` only deletes and is
    /// left out for entities that were never saved. Delete always comes
    /// last. Weights are assigned 5, 10, ... in that order.
    pub fn actions(&self) -> Vec<FormAction> {
        let mut actions = vec![FormAction {
            name: "submit".to_string(),
            label: "Save".to_string(),
            button_type: ButtonType::Primary,
            weight: 0,
            validate: vec![FormStep::Validate],
            submit: vec![FormStep::Submit, FormStep::Save],
        }];

        if !self.entity.is_new() {
            actions.push(FormAction {
                name: "delete".to_string(),
                label: "Delete".to_string(),
                button_type: ButtonType::Danger,
                weight: 0,
                validate: Vec::new(),
                submit: vec![FormStep::Delete],
            });
        }

        for (count, action) in actions.iter_mut().enumerate() {
            action.weight = (count as i32 + 1) * 5;
        }
        actions
    }

    /// Build the form, initialising `state` on first use.
    pub fn build_form(&mut self, state: &mut FormState) -> EntityForm {
        if !state.initialized {
            self.init(state);
        }

        let langcode = if self.entity.is_new() {
            self.languages.default_langcode.clone()
        } else {
            self.entity.langcode().to_string()
        };

        EntityForm {
            form_id: self.form_id(),
            base_form_id: self.base_form_id(),
            langcode,
            form_display: state.form_display.clone().unwrap_or_else(|| self.form_display_id()),
            actions: self.actions(),
        }
    }

    fn init(&mut self, state: &mut FormState) {
        state.initialized = true;

        let langcode = self.form_langcode(state);
        if let Some(translation) = self.entity.translation(&langcode) {
            self.entity = translation;
        }

        state.form_display = Some(self.form_display_id());
        self.handler.prepare(&mut self.entity, state);
    }

    /// Run the steps of `action_name`.
    ///
    /// Validation steps run first; if they leave errors on the state the
    /// submit steps are skipped.
    ///
    /// # Errors
    ///
    /// [`CmsError::InvalidFormState`] for an unknown action, or whatever a
    /// step returns.
    pub fn process(&mut self, action_name: &str, state: &mut FormState) -> Result<(), CmsError> {
        let action = self.actions().into_iter().find(|action| action.name == action_name).ok_or_else(|| {
            CmsError::InvalidFormState {
                reason: format!("unknown form action '{action_name}'"),
            }
        })?;

        for step in &action.validate {
            self.run_step(*step, state)?;
        }
        if state.has_errors() {
            tracing::debug!("Form {} has errors; skipping submit handlers", self.form_id());
            return Ok(());
        }
        for step in &action.submit {
            self.run_step(*step, state)?;
        }
        Ok(())
    }

    fn run_step(&mut self, step: FormStep, state: &mut FormState) -> Result<(), CmsError> {
        match step {
            FormStep::Validate => self.validate(state),
            FormStep::Submit => self.submit(state).map(|_| ()),
            FormStep::Save => self.save(state),
            FormStep::Delete => self.delete(state),
        }
    }

    /// Validate the submission.
    ///
    /// Builds a snapshot from the submitted values and maps each field
    /// violation to an error on the element of the same name.
    pub fn validate(&mut self, state: &mut FormState) -> Result<(), CmsError> {
        let snapshot = self.build_entity(state)?;
        let violations = snapshot.validate_fields();

        for (field, field_violations) in &violations {
            if let Some(first) = field_violations.first() {
                state.set_error(field.clone(), first.message.clone());
            }
        }
        state.violations = violations;

        self.handler.validate(&snapshot, state);
        Ok(())
    }

    /// Submit the form.
    ///
    /// Strips Form API internals, updates the form language, then replaces
    /// the edited entity with a snapshot built from the values before the
    /// submit hook runs.
    pub fn submit(&mut self, state: &mut FormState) -> Result<&E, CmsError> {
        state.clean_values();
        self.update_form_langcode(state);
        self.entity = self.build_entity(state)?;
        state.submitted = true;
        self.handler.submit(&mut self.entity, state)?;
        Ok(&self.entity)
    }

    /// Save the entity through the handler.
    pub fn save(&mut self, state: &mut FormState) -> Result<(), CmsError> {
        self.handler.save(&mut self.entity, state)
    }

    /// Delete the entity through the handler.
    pub fn delete(&mut self, state: &mut FormState) -> Result<(), CmsError> {
        self.handler.delete(&self.entity, state)
    }

    /// A copy of the entity with the submitted values applied.
    pub fn build_entity(&self, state: &FormState) -> Result<E, CmsError> {
        let mut entity = self.entity.clone();
        let langcode = self.form_langcode(state);
        entity.apply_form_values(&state.values, &langcode)?;
        Ok(entity)
    }

    /// Language the form edits.
    ///
    /// An explicit language on the state wins. Otherwise the current content
    /// language is used if the entity has that translation, then each
    /// fallback candidate (multilingual sites only), then the entity's own
    /// language. The walk stops at the first empty candidate.
    pub fn form_langcode(&self, state: &FormState) -> String {
        if let Some(langcode) = state.langcode.as_deref().filter(|l| !l.is_empty()) {
            return langcode.to_string();
        }

        let translations = self.entity.translation_languages();
        let fallback: &[String] = if self.languages.multilingual {
            &self.languages.fallback_candidates
        } else {
            &[]
        };
        let mut fallback = fallback.iter();

        // An empty candidate ends the chain
        let mut candidate = self.languages.current_content_langcode.as_deref();
        while let Some(langcode) = candidate.filter(|l| !l.is_empty()) {
            if translations.contains(langcode) {
                return langcode.to_string();
            }
            candidate = fallback.next().map(String::as_str);
        }

        self.entity.langcode().to_string()
    }

    /// Whether the form edits the entity's own language.
    pub fn is_default_form_langcode(&self, state: &FormState) -> bool {
        self.form_langcode(state) == self.entity.langcode()
    }

    fn update_form_langcode(&self, state: &mut FormState) {
        let Some(submitted) = state.values.get("langcode").and_then(|value| value.as_str()) else {
            return;
        };
        if self.is_default_form_langcode(state) {
            state.langcode = Some(submitted.to_string());
        }
    }
}
