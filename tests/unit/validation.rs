use cmscore::menu::{LocalTaskDefinition, Severity, ValidationIssue, YamlDiscovery, validate_definitions};
use cmscore::menu::{Discovery, DefinitionSet, process_definition};
use cmscore::routing::{MemoryRouteProvider, RouteProvider};
use cmscore::test_utils::{ModuleFixture, ROUTES_YAML};
use tempfile::TempDir;

fn load(fixtures: &[ModuleFixture]) -> (DefinitionSet, Vec<cmscore::core::CmsError>) {
    let temp = TempDir::new().unwrap();
    for fixture in fixtures {
        fixture.write_to(temp.path()).unwrap();
    }
    let outcome = YamlDiscovery::new(vec![temp.path().to_path_buf()]).discover();
    let mut errors = outcome.errors;
    let mut set = DefinitionSet::new();
    for definition in outcome.definitions {
        let id = definition.id.clone();
        match process_definition(&id, definition) {
            Ok(definition) => set.insert(definition),
            Err(e) => errors.push(e),
        }
    }
    (set, errors)
}

#[test]
fn test_fixture_modules_are_valid_against_routes() {
    let (set, errors) = load(&[ModuleFixture::node(), ModuleFixture::user()]);
    let routes = MemoryRouteProvider::from_yaml_str(ROUTES_YAML).unwrap();

    let report = validate_definitions(&set, &errors, Some(&routes as &dyn RouteProvider));

    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert!(!report.is_failure(true));
}

#[test]
fn test_broken_module_is_an_error() {
    let (set, errors) = load(&[ModuleFixture::node(), ModuleFixture::broken()]);

    let report = validate_definitions(&set, &errors, None);

    assert!(report.has_errors());
    let messages: Vec<String> = report.with_severity(Severity::Error).map(ToString::to_string).collect();
    assert!(messages.iter().any(|m| m.contains("broken.tab") && m.contains("route_name")));
}

#[test]
fn test_missing_routes_are_warnings() {
    let (set, errors) = load(&[ModuleFixture::node()]);
    let routes = MemoryRouteProvider::from_yaml_str("entity.node.canonical:\n  path: /node/{node}\n").unwrap();

    let report = validate_definitions(&set, &errors, Some(&routes as &dyn RouteProvider));

    assert!(!report.has_errors());
    assert!(report.has_warnings());
    assert!(!report.is_failure(false));
    assert!(report.is_failure(true));
    assert_eq!(report.with_severity(Severity::Warning).count(), 3);
}

#[test]
fn test_typo_in_parent_gets_suggestion() {
    let mut set = DefinitionSet::new();
    set.insert(LocalTaskDefinition::new("user.edit", "entity.user.edit_form", "user.page"));
    set.insert(LocalTaskDefinition::new("user.page", "user.page", "user.page"));
    set.insert(LocalTaskDefinition::new("user.edit.profile", "user.profile_form", "user.page").with_parent("user.edt"));

    let report = validate_definitions(&set, &[], None);

    assert!(report.issues.iter().any(|issue| matches!(
        issue,
        ValidationIssue::UnknownParent { parent_id, suggestion: Some(suggestion), .. }
            if parent_id == "user.edt" && suggestion == "user.edit"
    )));
}
