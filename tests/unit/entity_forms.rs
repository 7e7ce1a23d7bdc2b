use cmscore::block::{Block, CustomBlock, CustomBlockType};
use cmscore::core::CmsError;
use cmscore::entity::{
    ButtonType, ConfigEntity, ContentEntity, Entity, EntityFormController, EntityFormHandler, FormState, LanguageContext,
};
use std::sync::{Arc, Mutex};

/// Stores saved entities in a shared list.
struct Storage<E> {
    saved: Arc<Mutex<Vec<E>>>,
}

impl<E: Entity> EntityFormHandler<E> for Storage<E> {
    fn save(&mut self, entity: &mut E, _state: &mut FormState) -> Result<(), CmsError> {
        self.saved.lock().unwrap().push(entity.clone());
        Ok(())
    }
}

fn stored_block(langcode: &str, translations: &[&str]) -> CustomBlock {
    let mut block = CustomBlock::new("9d1a", "basic", "Footer contact");
    block.id = Some("4".to_string());
    block.langcode = langcode.to_string();
    block.translations = translations.iter().map(|l| l.to_string()).collect();
    block
}

#[test]
fn test_new_custom_block_form() {
    let mut controller = EntityFormController::new(CustomBlock::new("9d1a", "basic", ""), LanguageContext::default());
    let mut state = FormState::new();

    let form = controller.build_form(&mut state);

    assert_eq!(form.form_id, "basic_custom_block_form");
    assert_eq!(form.base_form_id.as_deref(), Some("custom_block_form"));
    assert_eq!(form.form_display, "custom_block.basic.default");
    assert_eq!(form.actions.len(), 1, "no delete button before the first save");
    assert_eq!(form.actions[0].button_type, ButtonType::Primary);
}

#[test]
fn test_custom_block_submission_is_saved() {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let mut controller = EntityFormController::new(stored_block("en", &[]), LanguageContext::default())
        .with_handler(Box::new(Storage {
            saved: saved.clone(),
        }));
    let mut state = FormState::new()
        .with_value("info", "Footer address")
        .with_value("revision_log", "Moved office")
        .with_value("form_token", "abc");
    controller.build_form(&mut state);

    controller.process("submit", &mut state).unwrap();

    let saved = saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].info, "Footer address");
    assert_eq!(saved[0].revision_log(), Some("Moved office"));
    assert!(!state.values.contains_key("form_token"));
}

#[test]
fn test_empty_description_blocks_save() {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let mut controller = EntityFormController::new(stored_block("en", &[]), LanguageContext::default())
        .with_handler(Box::new(Storage {
            saved: saved.clone(),
        }));
    let mut state = FormState::new().with_value("info", "  ");

    controller.process("submit", &mut state).unwrap();

    assert!(saved.lock().unwrap().is_empty());
    assert_eq!(state.errors.get("info").map(String::as_str), Some("Block description field is required."));
    assert_eq!(controller.entity().info, "Footer contact", "edited entity untouched");
}

#[test]
fn test_translation_form_uses_content_language() {
    let languages = LanguageContext::multilingual("en", "de", ["fr"]);
    let controller = EntityFormController::new(stored_block("en", &["de"]), languages);

    let state = FormState::new();
    assert_eq!(controller.form_langcode(&state), "de");
    assert!(!controller.is_default_form_langcode(&state));
}

#[test]
fn test_translation_form_falls_back() {
    let languages = LanguageContext::multilingual("en", "it", ["fr", "de"]);
    let controller = EntityFormController::new(stored_block("en", &["de"]), languages);

    assert_eq!(controller.form_langcode(&FormState::new()), "de");
}

#[test]
fn test_block_type_form_toggles_revision() {
    let mut block_type = CustomBlockType::new("basic", "Basic block");
    assert!(block_type.status());
    block_type.set_status(false);

    let mut controller = EntityFormController::new(block_type, LanguageContext::default());
    let mut state = FormState::new().with_value("revision", true).with_value("label", "Basic");
    let form = controller.build_form(&mut state);
    assert_eq!(form.form_id, "custom_block_type_form");
    assert_eq!(form.base_form_id, None);

    controller.process("submit", &mut state).unwrap();
    let block_type = controller.into_entity();
    assert!(block_type.revision);
    assert_eq!(block_type.label, "Basic");
    assert!(!block_type.status(), "status is not a form value");
}

#[test]
fn test_placed_blocks_of_custom_block() {
    let custom = stored_block("en", &[]);
    let placed = vec![
        Block::new(custom.plugin_id(), "olivero", "footer_top").with_id("footer_contact"),
        Block::new("system_branding_block", "olivero", "header").with_id("branding"),
        Block::new(custom.plugin_id(), "claro", "content").with_id("claro_contact"),
    ];

    let instances: Vec<Option<&str>> = custom.instances(&placed).into_iter().map(|block| block.id()).collect();
    assert_eq!(instances, vec![Some("footer_contact"), Some("claro_contact")]);
}
