//! Consistency checks over a definition set.
//!
//! Nothing here affects rendering; the resolver copes with every problem
//! reported below by leaving tabs out. The checks exist so module authors
//! can find out *why* a tab is missing.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt;
use strsim::levenshtein;

use super::definition::DefinitionSet;
use crate::core::CmsError;
use crate::routing::RouteProvider;

/// Maximum Levenshtein distance, as a percentage of the unknown id's
/// length, for a known id to be suggested.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// One problem found in the definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A definition was rejected while loading.
    Rejected {
        message: String,
    },
    /// `tab_root_id` names no known plugin.
    UnknownRoot {
        plugin_id: String,
        root_id: String,
        suggestion: Option<String>,
    },
    /// `tab_parent_id` names no known plugin.
    UnknownParent {
        plugin_id: String,
        parent_id: String,
        suggestion: Option<String>,
    },
    /// The route a tab links to is not known to the route provider.
    UnknownRoute {
        plugin_id: String,
        route_name: String,
    },
    /// Tabs whose parent links form a loop.
    ParentCycle {
        plugin_ids: Vec<String>,
    },
}

impl ValidationIssue {
    /// Severity of the issue.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Rejected {
                ..
            }
            | Self::ParentCycle {
                ..
            } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected {
                message,
            } => write!(f, "{message}"),
            Self::UnknownRoot {
                plugin_id,
                root_id,
                suggestion,
            } => {
                write!(f, "Local task '{plugin_id}' has unknown tab root '{root_id}'")?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{suggestion}'?)")?;
                }
                Ok(())
            }
            Self::UnknownParent {
                plugin_id,
                parent_id,
                suggestion,
            } => {
                write!(f, "Local task '{plugin_id}' has unknown parent '{parent_id}'")?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{suggestion}'?)")?;
                }
                Ok(())
            }
            Self::UnknownRoute {
                plugin_id,
                route_name,
            } => write!(f, "Local task '{plugin_id}' links to unknown route '{route_name}'"),
            Self::ParentCycle {
                plugin_ids,
            } => write!(f, "Parent cycle between local tasks: {}", plugin_ids.join(" → ")),
        }
    }
}

/// Issues found by [`validate_definitions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Issues of `severity`.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.severity() == severity)
    }

    /// Whether any error was found.
    pub fn has_errors(&self) -> bool {
        self.with_severity(Severity::Error).next().is_some()
    }

    /// Whether any warning was found.
    pub fn has_warnings(&self) -> bool {
        self.with_severity(Severity::Warning).next().is_some()
    }

    /// Whether the report fails validation. Strict mode fails on warnings too.
    pub fn is_failure(&self, strict: bool) -> bool {
        self.has_errors() || (strict && self.has_warnings())
    }
}

/// Check `definitions` for dangling references and parent loops.
///
/// `rejected` are the load failures to include in the report. When `routes`
/// is given, every route a tab links to must be known to it.
pub fn validate_definitions(
    definitions: &DefinitionSet,
    rejected: &[CmsError],
    routes: Option<&dyn RouteProvider>,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let known = definitions.ids();

    report.issues.extend(rejected.iter().map(|error| ValidationIssue::Rejected {
        message: error.to_string(),
    }));

    for definition in definitions.iter() {
        if !definition.tab_root_id.is_empty() && !definitions.contains(&definition.tab_root_id) {
            report.issues.push(ValidationIssue::UnknownRoot {
                plugin_id: definition.id.clone(),
                root_id: definition.tab_root_id.clone(),
                suggestion: find_similar_id(&definition.tab_root_id, &known),
            });
        }
        if let Some(parent) = definition.parent_id()
            && !definitions.contains(parent)
        {
            report.issues.push(ValidationIssue::UnknownParent {
                plugin_id: definition.id.clone(),
                parent_id: parent.to_string(),
                suggestion: find_similar_id(parent, &known),
            });
        }
    }

    if let Some(routes) = routes {
        let mut names: Vec<String> = definitions.iter().map(|d| d.route_name.clone()).collect();
        names.sort();
        names.dedup();
        let found = routes.get_routes_by_names(&names);
        for definition in definitions.iter().filter(|d| !found.contains_key(&d.route_name)) {
            report.issues.push(ValidationIssue::UnknownRoute {
                plugin_id: definition.id.clone(),
                route_name: definition.route_name.clone(),
            });
        }
    }

    report.issues.extend(find_parent_cycles(definitions).into_iter().map(|plugin_ids| {
        ValidationIssue::ParentCycle {
            plugin_ids,
        }
    }));

    report
}

/// Groups of plugin ids whose parent links loop, each sorted.
fn find_parent_cycles(definitions: &DefinitionSet) -> Vec<Vec<String>> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();

    for definition in definitions.iter() {
        let index = graph.add_node(definition.id.clone());
        node_map.insert(definition.id.as_str(), index);
    }

    for definition in definitions.iter() {
        if let Some(parent) = definition.parent_id()
            && let Some(&parent_index) = node_map.get(parent)
        {
            graph.add_edge(node_map[definition.id.as_str()], parent_index, ());
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut ids: Vec<String> = component.into_iter().map(|index| graph[index].clone()).collect();
            ids.sort();
            ids
        })
        .collect();
    cycles.sort();
    cycles
}

/// Closest known id within the similarity threshold.
fn find_similar_id(target: &str, known: &[String]) -> Option<String> {
    let limit = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
    known
        .iter()
        .map(|id| (levenshtein(target, id), id))
        .filter(|(distance, _)| *distance <= limit)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, id)| id.clone())
}
