//! Materialized tab trees.

use std::collections::{BTreeMap, BTreeSet};

use super::hierarchy::{HierarchyEntry, WalkMode};
use super::local_task::{LocalTask, TaskFactoryRegistry};

/// Task instances of one route grouped by depth.
///
/// `active_overrides` holds the ancestors of the current tab that live on a
/// different route. They render as active even though their own route does
/// not match the request.
#[derive(Default)]
pub struct LocalTaskTree {
    levels: BTreeMap<usize, Vec<Box<dyn LocalTask>>>,
    active_overrides: BTreeSet<String>,
}

impl std::fmt::Debug for LocalTaskTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let levels: BTreeMap<_, Vec<_>> = self
            .levels
            .iter()
            .map(|(depth, tasks)| (*depth, tasks.iter().map(|t| t.plugin_id().to_string()).collect()))
            .collect();
        f.debug_struct("LocalTaskTree")
            .field("levels", &levels)
            .field("active_overrides", &self.active_overrides)
            .finish()
    }
}

impl LocalTaskTree {
    /// Instantiate the tasks of `entry` for `route_name`.
    ///
    /// Groups are walked in `tab_root_ids` order with `mode`. A plugin id met
    /// twice at the same depth keeps its first position and latest instance.
    pub fn materialize(
        route_name: &str,
        entry: &HierarchyEntry,
        mode: WalkMode,
        factories: &TaskFactoryRegistry,
    ) -> Self {
        let mut tree = Self::default();

        for root_id in &entry.tab_root_ids {
            for (depth, definitions) in entry.levels(root_id, mode) {
                for definition in definitions {
                    if entry.parents.contains(&definition.id) && definition.route_name != route_name {
                        tree.active_overrides.insert(definition.id.clone());
                    }
                    tree.insert(depth, factories.create(definition.clone()));
                }
            }
        }

        tree
    }

    fn insert(&mut self, depth: usize, task: Box<dyn LocalTask>) {
        let level = self.levels.entry(depth).or_default();
        match level.iter().position(|existing| existing.plugin_id() == task.plugin_id()) {
            Some(position) => level[position] = task,
            None => level.push(task),
        }
    }

    /// Tasks by depth.
    pub fn levels(&self) -> &BTreeMap<usize, Vec<Box<dyn LocalTask>>> {
        &self.levels
    }

    /// Tasks at one depth.
    pub fn level(&self, depth: usize) -> &[Box<dyn LocalTask>] {
        self.levels.get(&depth).map(Vec::as_slice).unwrap_or_default()
    }

    /// Ancestors forced into the active state.
    pub fn active_overrides(&self) -> &BTreeSet<String> {
        &self.active_overrides
    }

    /// Whether `plugin_id` is forced active.
    pub fn is_forced_active(&self, plugin_id: &str) -> bool {
        self.active_overrides.contains(plugin_id)
    }

    /// Every task in depth order.
    pub fn tasks(&self) -> impl Iterator<Item = (usize, &dyn LocalTask)> {
        self.levels
            .iter()
            .flat_map(|(depth, tasks)| tasks.iter().map(move |task| (*depth, task.as_ref())))
    }

    /// Distinct route names referenced by any task, sorted.
    pub fn route_names(&self) -> Vec<String> {
        let names: BTreeSet<String> = self.tasks().map(|(_, task)| task.route_name().to_string()).collect();
        names.into_iter().collect()
    }

    /// Whether the tree holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.levels.values().all(Vec::is_empty)
    }
}
