//! Local tasks: the tabs shown above a page.
//!
//! Tabs are declared as plugin definitions, each linking to a route and
//! belonging to a group identified by its tab root. For a given route the
//! [`LocalTaskManager`] works out which groups are visible, rebuilds the
//! parent/child tree of those groups, caches its shape, instantiates one
//! task per visible tab and finally produces an access-checked render list
//! grouped by depth.
//!
//! # Pipeline
//!
//! 1. [`discovery`]: load raw definitions (YAML files, static lists,
//!    derivatives)
//! 2. [`process_definition`]: apply defaults, reject definitions without a
//!    route
//! 3. [`build_hierarchy`]: reduce the definitions to the
//!    [`HierarchyEntry`] of one route, cached permanently under
//!    `local_task:<langcode>:<route>`
//! 4. [`LocalTaskTree::materialize`]: walk the entry per [`WalkMode`] and
//!    instantiate tasks through the [`TaskFactoryRegistry`]
//! 5. [`assemble`]: batch route lookup, access filtering, active state,
//!    titles
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cmscore::cache::MemoryBackend;
//! use cmscore::menu::{LocalTaskDefinition, LocalTaskManager, StaticDiscovery};
//! use cmscore::routing::{Account, MemoryRouteProvider, PermissionAccessManager, Request, Route};
//!
//! let routes = Arc::new(
//!     MemoryRouteProvider::new()
//!         .with_route(Route::new("node.view", "/node/{node}").with_requirement("_access", "TRUE")),
//! );
//! let access = Arc::new(PermissionAccessManager::new(routes.clone(), Account::default()));
//! let discovery = StaticDiscovery::new(vec![
//!     LocalTaskDefinition::new("node.view", "node.view", "node.view").with_title("View"),
//! ]);
//!
//! let mut manager = LocalTaskManager::new(
//!     Box::new(discovery),
//!     Arc::new(MemoryBackend::new()),
//!     routes,
//!     access,
//!     Request::for_route("node.view").with_attribute("node", "1"),
//! );
//! let build = manager.get_tasks_build("node.view");
//! assert!(build.get("node.view").is_some_and(|link| link.active));
//! ```

mod definition;
pub mod discovery;
mod hierarchy;
mod local_task;
mod manager;
mod render;
mod tree;
mod validation;


pub use definition::{DefinitionSet, LinkOptions, LocalTaskDefinition, process_definition};
pub use discovery::{
    DerivativeDiscovery, DeriverFn, Discovery, DiscoveryOutcome, StaticDiscovery, YamlDiscovery,
};
pub use hierarchy::{HierarchyEntry, ROOT_MARKER_PREFIX, WalkMode, build_hierarchy, root_marker};
pub use local_task::{
    ACTIVE_CLASS, LocalTask, LocalTaskDefault, ROOT_TAB_WEIGHT, TaskFactory, TaskFactoryRegistry, add_class,
};
pub use manager::{CACHE_PREFIX, CACHE_TAG, DEFAULT_LANGCODE, LocalTaskManager};
pub use render::{LocalTaskLink, TaskBuild, assemble};
pub use tree::LocalTaskTree;
pub use validation::{Severity, ValidationIssue, ValidationReport, validate_definitions};
