use cmscore::cache::{CacheBackend, MemoryBackend};
use cmscore::menu::{CACHE_TAG, LocalTaskManager, WalkMode, YamlDiscovery};
use cmscore::routing::{Account, MemoryRouteProvider, PermissionAccessManager, Request};
use cmscore::test_utils::{ModuleFixture, ROUTES_YAML, init_test_logging};
use std::sync::Arc;
use tempfile::TempDir;

struct Site {
    _dir: TempDir,
    modules: std::path::PathBuf,
    routes: Arc<MemoryRouteProvider>,
    cache: Arc<MemoryBackend>,
}

impl Site {
    fn new() -> Self {
        init_test_logging(None);
        let dir = TempDir::new().unwrap();
        let modules = dir.path().join("modules");
        ModuleFixture::node().write_to(&modules).unwrap();
        ModuleFixture::user().write_to(&modules).unwrap();
        Self {
            _dir: dir,
            modules,
            routes: Arc::new(MemoryRouteProvider::from_yaml_str(ROUTES_YAML).unwrap()),
            cache: Arc::new(MemoryBackend::new()),
        }
    }

    fn manager(&self, permissions: &[&str], request: Request) -> LocalTaskManager {
        let account = Account::with_permissions(5, permissions.iter().copied());
        LocalTaskManager::new(
            Box::new(YamlDiscovery::new(vec![self.modules.clone()])),
            self.cache.clone(),
            self.routes.clone(),
            Arc::new(PermissionAccessManager::new(self.routes.clone(), account)),
            request,
        )
    }
}

fn node_request(route: &str) -> Request {
    Request::for_route(route).with_attribute("node", "7")
}

#[test]
fn test_node_tabs_follow_permissions() {
    let site = Site::new();

    let mut viewer = site.manager(&["access content"], node_request("entity.node.canonical"));
    let build = viewer.get_tasks_build("entity.node.canonical");
    let ids: Vec<&str> = build.level(0).iter().map(|link| link.plugin_id.as_str()).collect();
    assert_eq!(ids, vec!["node.view"]);

    let mut editor = site.manager(
        &["access content", "edit any content", "delete any content", "view revisions"],
        node_request("entity.node.canonical"),
    );
    let build = editor.get_tasks_build("entity.node.canonical");
    let ids: Vec<&str> = build.level(0).iter().map(|link| link.plugin_id.as_str()).collect();
    assert_eq!(ids, vec!["node.view", "node.edit", "node.delete", "node.revisions"]);
}

#[test]
fn test_node_edit_marks_only_edit_active() {
    let site = Site::new();
    let mut manager = site.manager(&["access content", "edit any content"], node_request("entity.node.edit_form"));

    let build = manager.get_tasks_build("entity.node.edit_form");

    let view = build.get("node.view").unwrap();
    let edit = build.get("node.edit").unwrap();
    assert!(!view.active);
    assert!(edit.active);
    assert_eq!(edit.route_parameters.get("node").map(String::as_str), Some("7"));
    assert_eq!(view.weight, -10, "tab root sorts first");
}

#[test]
fn test_user_edit_renders_secondary_level() {
    let site = Site::new();
    let request = Request::for_route("entity.user.edit_form").with_attribute("user", "3");
    let mut manager = site.manager(&[], request);

    let build = manager.get_tasks_build("entity.user.edit_form");

    assert_eq!(build.depth(), 2);
    let primary: Vec<&str> = build.level(0).iter().map(|link| link.plugin_id.as_str()).collect();
    let secondary: Vec<&str> = build.level(1).iter().map(|link| link.plugin_id.as_str()).collect();
    assert_eq!(primary, vec!["user.page", "user.edit"]);
    assert_eq!(secondary, vec!["user.edit.account", "user.edit.profile"]);
    assert!(build.get("user.edit").unwrap().active);
    assert!(build.get("user.edit.account").unwrap().active);
    assert!(!build.get("user.edit.profile").unwrap().active);
    assert!(!build.get("user.page").unwrap().active);
}

#[test]
fn test_profile_form_keeps_edit_active() {
    let site = Site::new();
    let request = Request::for_route("user.profile_form").with_attribute("user", "3");
    let mut manager = site.manager(&[], request);

    let build = manager.get_tasks_build("user.profile_form");

    assert!(build.get("user.edit").unwrap().active, "parent on another route is forced active");
    assert!(build.get("user.edit.profile").unwrap().active);
    assert!(!build.get("user.edit.account").unwrap().active);
}

#[test]
fn test_hierarchies_are_cached_under_tag() {
    let site = Site::new();
    let mut manager = site.manager(&["access content"], node_request("entity.node.canonical"));

    manager.get_tasks_build("entity.node.canonical");
    let key = manager.route_cache_key("entity.node.canonical");
    let item = site.cache.get(&key).unwrap();
    assert!(item.tags.iter().any(|tag| tag == CACHE_TAG));

    site.cache.invalidate_tags(&[CACHE_TAG]);
    assert!(site.cache.get(&key).is_none());
}

#[test]
fn test_full_fan_out_matches_single_branch_on_fixture() {
    let site = Site::new();
    let request = Request::for_route("entity.user.edit_form").with_attribute("user", "3");

    let single = site.manager(&[], request.clone()).get_tasks_build("entity.user.edit_form");
    let full = site
        .manager(&[], request)
        .with_walk_mode(WalkMode::FullFanOut)
        .get_tasks_build("entity.user.edit_form");

    assert_eq!(single, full);
}
