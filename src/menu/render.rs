//! Render list assembly.
//!
//! Turns a materialized tree into the access-checked list of links handed to
//! the theme layer. Route metadata for every task is fetched in a single
//! batch call before any task is looked at.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::definition::LinkOptions;
use super::tree::LocalTaskTree;
use crate::routing::{AccessCheck, Request, RouteParameters, RouteProvider};

/// One rendered tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTaskLink {
    pub plugin_id: String,
    pub title: String,
    pub route_name: String,
    pub route_parameters: RouteParameters,
    pub localized_options: LinkOptions,
    pub active: bool,
    pub weight: i64,
    /// Always `true` for emitted links; denied tasks are left out entirely.
    pub access: bool,
}

/// Rendered tabs by depth, each level in tree order.
///
/// A level whose tasks were all denied is absent rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskBuild {
    levels: BTreeMap<usize, Vec<LocalTaskLink>>,
}

impl TaskBuild {
    /// All levels.
    pub fn levels(&self) -> &BTreeMap<usize, Vec<LocalTaskLink>> {
        &self.levels
    }

    /// Links at `depth`, empty if the level is absent.
    pub fn level(&self, depth: usize) -> &[LocalTaskLink] {
        self.levels.get(&depth).map(Vec::as_slice).unwrap_or_default()
    }

    /// Find a link by plugin id.
    pub fn get(&self, plugin_id: &str) -> Option<&LocalTaskLink> {
        self.levels.values().flatten().find(|link| link.plugin_id == plugin_id)
    }

    /// Number of levels present.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Total number of links.
    pub fn len(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    /// Whether no tab is rendered.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Build the render list of `tree` for `request`.
///
/// A task is active when its route is the current route and every computed
/// parameter matches the request attribute of the same name, or when the
/// tree forced it active.
pub fn assemble(
    tree: &LocalTaskTree,
    request: &Request,
    routes: &dyn RouteProvider,
    access: &dyn AccessCheck,
) -> TaskBuild {
    let mut build = TaskBuild::default();
    if tree.is_empty() {
        return build;
    }

    let names = tree.route_names();
    let metadata = routes.get_routes_by_names(&names);
    if metadata.len() < names.len() {
        for name in names.iter().filter(|name| !metadata.contains_key(*name)) {
            tracing::debug!("No route metadata for '{name}'; using definition parameters only");
        }
    }

    let current_route = request.route_name.as_deref();

    for (depth, task) in tree.tasks() {
        let route_name = task.route_name();
        let parameters = task.route_parameters(request, metadata.get(route_name));

        if !access.check_named_route(route_name, &parameters) {
            tracing::trace!("Access denied to local task {}", task.plugin_id());
            continue;
        }

        let active = (current_route == Some(route_name) && request.matches_parameters(&parameters))
            || tree.is_forced_active(task.plugin_id());

        build.levels.entry(depth).or_default().push(LocalTaskLink {
            plugin_id: task.plugin_id().to_string(),
            title: task.title(request),
            route_name: route_name.to_string(),
            localized_options: task.options(request, active),
            route_parameters: parameters,
            active,
            weight: task.weight(),
            access: true,
        });
    }

    build
}
