use cmscore::cache::MemoryBackend;
use cmscore::core::CmsError;
use cmscore::menu::{DerivativeDiscovery, DeriverFn, Discovery, LocalTaskDefinition, LocalTaskManager, YamlDiscovery};
use cmscore::routing::Request;
use cmscore::test_utils::{CountingRouteProvider, ModuleFixture, StaticAccess};
use std::sync::Arc;
use tempfile::TempDir;

const CONFIG_TASKS: &str = r#"
config.translation:
  route_name: config.translation.overview
  title: Translate
  tab_root_id: config.translation
  deriver: config_translation
"#;

fn write_module(dir: &std::path::Path, name: &str, content: &str) {
    ModuleFixture {
        name: name.to_string(),
        local_tasks: content.to_string(),
    }
    .write_to(dir)
    .unwrap();
}

fn translation_deriver() -> DeriverFn {
    Arc::new(|base: &LocalTaskDefinition| {
        ["block", "menu"]
            .iter()
            .map(|mapper| {
                let mut derivative = base.clone();
                derivative.route_name = format!("config.translation.{mapper}");
                derivative.title = format!("Translate {mapper}");
                (mapper.to_string(), derivative)
            })
            .collect()
    })
}

#[test]
fn test_modules_are_discovered_in_sorted_order() {
    let temp = TempDir::new().unwrap();
    ModuleFixture::user().write_to(temp.path()).unwrap();
    ModuleFixture::node().write_to(temp.path()).unwrap();

    let outcome = YamlDiscovery::new(vec![temp.path().to_path_buf()]).discover();

    assert!(outcome.errors.is_empty());
    let ids: Vec<&str> = outcome.definitions.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"node.view"), "node sorts before user");
    assert_eq!(ids.last(), Some(&"user.edit.profile"));
    assert!(outcome.definitions.iter().filter(|d| d.id.starts_with("user.")).all(|d| d.provider.as_deref() == Some("user")));
}

#[test]
fn test_later_directory_overrides_definition() {
    let core = TempDir::new().unwrap();
    let contrib = TempDir::new().unwrap();
    ModuleFixture::node().write_to(core.path()).unwrap();
    write_module(contrib.path(), "custom", "node.edit:\n  route_name: entity.node.edit_form\n  title: Modify\n  tab_root_id: node.view\n");

    let mut manager = LocalTaskManager::new(
        Box::new(YamlDiscovery::new(vec![core.path().to_path_buf(), contrib.path().to_path_buf()])),
        Arc::new(MemoryBackend::new()),
        Arc::new(CountingRouteProvider::open_routes(&[])),
        Arc::new(StaticAccess::allow_all()),
        Request::default(),
    );

    let definition = manager.get_definition("node.edit").unwrap();
    assert_eq!(definition.title, "Modify");
    assert_eq!(definition.provider.as_deref(), Some("custom"));
    let ids = manager.get_definitions().ids();
    assert_eq!(ids.iter().position(|id| id == "node.edit"), Some(1), "replaced in place");
}

#[test]
fn test_derivatives_render_as_tabs() {
    let temp = TempDir::new().unwrap();
    write_module(temp.path(), "config_translation", CONFIG_TASKS);

    let discovery = DerivativeDiscovery::new(Box::new(YamlDiscovery::new(vec![temp.path().to_path_buf()])))
        .with_deriver("config_translation", translation_deriver());
    let outcome = discovery.discover();

    let ids: Vec<&str> = outcome.definitions.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["config.translation:block", "config.translation:menu"]);
    assert!(outcome.definitions.iter().all(|d| d.deriver.is_none()));
    assert!(outcome.definitions.iter().all(|d| d.provider.as_deref() == Some("config_translation")));
}

#[test]
fn test_unknown_deriver_is_reported() {
    let temp = TempDir::new().unwrap();
    write_module(temp.path(), "config_translation", CONFIG_TASKS);

    let discovery = DerivativeDiscovery::new(Box::new(YamlDiscovery::new(vec![temp.path().to_path_buf()])));
    let outcome = discovery.discover();

    assert!(outcome.definitions.is_empty());
    assert!(matches!(
        outcome.errors.as_slice(),
        [CmsError::UnknownDeriver { plugin_id, deriver }]
            if plugin_id == "config.translation" && deriver == "config_translation"
    ));
}

#[test]
fn test_malformed_file_does_not_hide_other_modules() {
    let temp = TempDir::new().unwrap();
    ModuleFixture::node().write_to(temp.path()).unwrap();
    write_module(temp.path(), "bad", "- just\n- a list\n");

    let outcome = YamlDiscovery::new(vec![temp.path().to_path_buf()]).discover();

    assert_eq!(outcome.definitions.len(), 4);
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(outcome.errors[0], CmsError::DiscoveryFailed { .. }));
}
