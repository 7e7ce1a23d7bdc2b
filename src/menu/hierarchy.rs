//! Per-route tab hierarchy.
//!
//! [`build_hierarchy`] reduces the full definition set to the shape needed
//! to render the tabs of one route: which tab groups are visible, which
//! tabs lie on the path to the current route, and the children of every
//! visible parent. The result is what gets persisted in the cache, so it
//! holds plain data only and serializes deterministically.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::definition::{DefinitionSet, LocalTaskDefinition};

/// Prefix of the synthetic parent key used for top-level tabs of a group.
pub const ROOT_MARKER_PREFIX: &str = "> ";

/// Synthetic `children` key for the top-level tabs of `root_id`.
pub fn root_marker(root_id: &str) -> String {
    format!("{ROOT_MARKER_PREFIX}{root_id}")
}

/// How the materializer walks down a tab group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkMode {
    /// Descend into one child-bearing tab per level: the last one found.
    #[default]
    #[serde(rename = "single-branch")]
    SingleBranch,
    /// Descend into every child-bearing tab of a level.
    #[serde(rename = "full")]
    FullFanOut,
}

impl std::fmt::Display for WalkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalkMode::SingleBranch => write!(f, "single-branch"),
            WalkMode::FullFanOut => write!(f, "full"),
        }
    }
}

/// The cached hierarchy of one route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    /// Root ids having at least one tab on the route, first-seen order.
    pub tab_root_ids: Vec<String>,
    /// Plugin ids on the path to the route: the matching tabs and their
    /// immediate parents.
    pub parents: BTreeSet<String>,
    /// Parent key (plugin id or [`root_marker`]) to the definitions under it,
    /// in definition order.
    pub children: BTreeMap<String, Vec<LocalTaskDefinition>>,
}

impl HierarchyEntry {
    /// Whether the route has no tabs at all.
    pub fn is_empty(&self) -> bool {
        self.tab_root_ids.is_empty()
    }

    /// Children registered under `key`, empty when there are none.
    pub fn children_of(&self, key: &str) -> &[LocalTaskDefinition] {
        self.children.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `key` has visible children.
    pub fn has_children(&self, key: &str) -> bool {
        self.children.get(key).is_some_and(|children| !children.is_empty())
    }

    /// Walk the group of `root_id` level by level.
    ///
    /// Yields `(depth, definitions)` for each level reached. Parent keys
    /// already visited are never revisited, so a parent loop in the
    /// definitions ends the walk instead of spinning forever.
    pub fn levels(&self, root_id: &str, mode: WalkMode) -> Vec<(usize, Vec<&LocalTaskDefinition>)> {
        let mut levels = Vec::new();
        let mut visited = HashSet::new();
        let mut frontier = vec![root_marker(root_id)];
        let mut depth = 0;

        while !frontier.is_empty() {
            let mut level = Vec::new();
            let mut next = Vec::new();

            for key in &frontier {
                if !visited.insert(key.clone()) {
                    continue;
                }
                for definition in self.children_of(key) {
                    level.push(definition);
                    if self.has_children(&definition.id) {
                        match mode {
                            WalkMode::SingleBranch => {
                                next.clear();
                                next.push(definition.id.clone());
                            }
                            WalkMode::FullFanOut => {
                                if !next.contains(&definition.id) {
                                    next.push(definition.id.clone());
                                }
                            }
                        }
                    }
                }
            }

            if level.is_empty() {
                break;
            }
            levels.push((depth, level));
            depth += 1;
            frontier = next;
        }

        levels
    }
}

/// Build the hierarchy entry of `route_name` from `definitions`.
///
/// 1. Every definition targeting the route contributes its root id, marks
///    itself on the path and marks its declared parent on the path. Only
///    the immediate parent is marked, not the full ancestor chain.
/// 2. Every definition of a visible group whose parent is empty or on the
///    path is filed under its parent key.
///
/// Definitions with an empty root id never belong to a group and are
/// skipped.
pub fn build_hierarchy(route_name: &str, definitions: &DefinitionSet) -> HierarchyEntry {
    let mut entry = HierarchyEntry::default();

    for definition in definitions.iter().filter(|d| d.route_name == route_name) {
        if definition.tab_root_id.is_empty() {
            tracing::debug!("Local task {} has no tab root and is ignored", definition.id);
            continue;
        }
        if !entry.tab_root_ids.contains(&definition.tab_root_id) {
            entry.tab_root_ids.push(definition.tab_root_id.clone());
        }
        entry.parents.insert(definition.id.clone());
        if let Some(parent) = definition.parent_id() {
            entry.parents.insert(parent.to_string());
        }
    }

    if entry.tab_root_ids.is_empty() {
        return entry;
    }

    for definition in definitions.iter() {
        if !entry.tab_root_ids.contains(&definition.tab_root_id) {
            continue;
        }
        let key = match definition.parent_id() {
            None => root_marker(&definition.tab_root_id),
            Some(parent) if entry.parents.contains(parent) => parent.to_string(),
            Some(_) => continue,
        };
        entry.children.entry(key).or_default().push(definition.clone());
    }

    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str, route: &str, root: &str, parent: Option<&str>) -> LocalTaskDefinition {
        let definition = LocalTaskDefinition::new(id, route, root);
        match parent {
            Some(parent) => definition.with_parent(parent),
            None => definition,
        }
    }

    fn ids(definitions: &[&LocalTaskDefinition]) -> Vec<String> {
        definitions.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_root_and_child() {
        let set: DefinitionSet = vec![def("A", "r1", "A", None), def("B", "r2", "A", Some("A"))].into();
        let entry = build_hierarchy("r2", &set);

        assert_eq!(entry.tab_root_ids, vec!["A".to_string()]);
        assert_eq!(entry.parents, BTreeSet::from(["A".to_string(), "B".to_string()]));
        assert_eq!(entry.children_of("> A").len(), 1);
        assert_eq!(entry.children_of("A")[0].id, "B");
    }

    #[test]
    fn test_unrelated_route_is_empty() {
        let set: DefinitionSet = vec![def("A", "r1", "A", None)].into();
        let entry = build_hierarchy("elsewhere", &set);
        assert!(entry.is_empty());
        assert!(entry.children.is_empty());
        assert!(entry.parents.is_empty());
    }

    #[test]
    fn test_only_immediate_parent_is_marked() {
        // A > B > C > D, requesting D's route
        let set: DefinitionSet = vec![
            def("A", "ra", "A", None),
            def("B", "rb", "A", Some("A")),
            def("C", "rc", "A", Some("B")),
            def("D", "rd", "A", Some("C")),
        ]
        .into();
        let entry = build_hierarchy("rd", &set);

        assert!(entry.parents.contains("C"));
        assert!(entry.parents.contains("D"));
        assert!(!entry.parents.contains("B"));
        // B's parent A is not on the path, so B is not filed at all
        assert!(entry.children_of("A").is_empty());
        assert_eq!(entry.children_of("C")[0].id, "D");
    }

    #[test]
    fn test_hidden_branch_is_excluded() {
        let set: DefinitionSet = vec![
            def("A", "r1", "A", None),
            def("B", "r2", "A", None),
            def("B1", "r3", "A", Some("B")),
            def("A1", "r4", "A", Some("A")),
        ]
        .into();
        let entry = build_hierarchy("r4", &set);

        assert_eq!(ids(&entry.children_of("> A").iter().collect::<Vec<_>>()), vec!["A", "B"]);
        assert!(!entry.children.contains_key("B"));
        assert_eq!(entry.children_of("A")[0].id, "A1");
    }

    #[test]
    fn test_empty_root_is_skipped() {
        let set: DefinitionSet = vec![def("X", "r1", "", None)].into();
        assert!(build_hierarchy("r1", &set).is_empty());
    }

    #[test]
    fn test_single_branch_follows_last_child_bearing_node() {
        let set: DefinitionSet = vec![
            def("root", "r0", "root", None),
            def("a", "r1", "root", None),
            def("a1", "r1", "root", Some("a")),
            def("b", "r2", "root", None),
            def("b1", "r1", "root", Some("b")),
        ]
        .into();
        let entry = build_hierarchy("r1", &set);
        let levels = entry.levels("root", WalkMode::SingleBranch);

        assert_eq!(levels.len(), 2);
        assert_eq!(ids(&levels[0].1), vec!["root", "a", "b"]);
        assert_eq!(ids(&levels[1].1), vec!["b1"]);
    }

    #[test]
    fn test_full_fan_out_visits_every_branch() {
        let set: DefinitionSet = vec![
            def("root", "r0", "root", None),
            def("a", "r1", "root", None),
            def("a1", "r1", "root", Some("a")),
            def("b", "r2", "root", None),
            def("b1", "r1", "root", Some("b")),
        ]
        .into();
        let entry = build_hierarchy("r1", &set);
        let levels = entry.levels("root", WalkMode::FullFanOut);

        assert_eq!(ids(&levels[1].1), vec!["a1", "b1"]);
    }

    #[test]
    fn test_parent_loop_terminates() {
        let set: DefinitionSet = vec![
            def("top", "r0", "g", None),
            def("x", "r1", "g", Some("y")),
            def("y", "r1", "g", Some("x")),
        ]
        .into();
        let entry = build_hierarchy("r1", &set);
        let levels = entry.levels("g", WalkMode::SingleBranch);
        assert_eq!(levels.len(), 1);
    }

    #[test]
    fn test_entry_roundtrip() {
        let set: DefinitionSet = vec![def("A", "r1", "A", None), def("B", "r2", "A", Some("A"))].into();
        let entry = build_hierarchy("r2", &set);
        let value = serde_json::to_value(&entry).unwrap();
        let back: HierarchyEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_walk_mode_names() {
        assert_eq!(serde_json::to_string(&WalkMode::FullFanOut).unwrap(), "\"full\"");
        assert_eq!(WalkMode::default().to_string(), "single-branch");
    }
}
