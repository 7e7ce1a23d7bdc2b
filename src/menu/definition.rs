//! Local task definitions and their validation.
//!
//! A definition is the static, declarative description of one tab. Every
//! field except `route_name` has a default, applied by serde when the field
//! is absent from the source. [`process_definition`] then rejects anything
//! that cannot be rendered.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::CmsError;
use crate::routing::RouteParameters;

/// Link options attached to a rendered tab (attributes, query, fragment...).
pub type LinkOptions = serde_json::Map<String, serde_json::Value>;

/// Static description of one local task (tab).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTaskDefinition {
    /// Plugin id; set from the top-level key during discovery.
    #[serde(default)]
    pub id: String,

    /// The route this task links to. Required.
    #[serde(default)]
    pub route_name: String,

    /// Parameters for route variables when generating the link.
    #[serde(default)]
    pub route_parameters: RouteParameters,

    /// Static title; tasks may compute a different one at render time.
    #[serde(default)]
    pub title: String,

    /// Plugin id of the root tab of this task's group.
    #[serde(default)]
    pub tab_root_id: String,

    /// Plugin id of the parent tab, absent for top-level tabs.
    #[serde(default)]
    pub tab_parent_id: Option<String>,

    /// Sort weight; see [`LocalTask::weight`](super::LocalTask::weight) for the fallback.
    #[serde(default)]
    pub weight: Option<i64>,

    /// Default link options.
    #[serde(default)]
    pub options: LinkOptions,

    /// Module that provided the definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Name of a registered deriver expanding this definition into several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deriver: Option<String>,
}

impl LocalTaskDefinition {
    /// Create a definition with defaults for everything but id, route and root.
    pub fn new(id: impl Into<String>, route_name: impl Into<String>, tab_root_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            route_name: route_name.into(),
            route_parameters: RouteParameters::new(),
            title: String::new(),
            tab_root_id: tab_root_id.into(),
            tab_parent_id: None,
            weight: None,
            options: LinkOptions::new(),
            provider: None,
            deriver: None,
        }
    }

    /// Set the parent tab (builder style).
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.tab_parent_id = Some(parent.into());
        self
    }

    /// Set the static title (builder style).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the weight (builder style).
    #[must_use]
    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Add a route parameter (builder style).
    #[must_use]
    pub fn with_route_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.route_parameters.insert(key.into(), value.into());
        self
    }

    /// The parent id, treating an empty string like an absent one.
    pub fn parent_id(&self) -> Option<&str> {
        self.tab_parent_id.as_deref().filter(|parent| !parent.is_empty())
    }
}

/// Validate a discovered definition.
///
/// The plugin id is taken from `plugin_id` when the body did not carry one.
///
/// # Errors
///
/// [`CmsError::InvalidDefinition`] when `route_name` is empty. Such a
/// definition must never enter the registry.
pub fn process_definition(
    plugin_id: &str,
    mut definition: LocalTaskDefinition,
) -> Result<LocalTaskDefinition, CmsError> {
    if definition.id.is_empty() {
        definition.id = plugin_id.to_string();
    }

    if definition.route_name.trim().is_empty() {
        return Err(CmsError::InvalidDefinition {
            plugin_id: plugin_id.to_string(),
            reason: "definition must include \"route_name\"".to_string(),
        });
    }

    Ok(definition)
}

/// An ordered set of processed definitions keyed by plugin id.
///
/// Iteration follows discovery order, which the hierarchy walk depends on.
/// Inserting an id that already exists replaces the definition in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LocalTaskDefinition>", into = "Vec<LocalTaskDefinition>")]
pub struct DefinitionSet {
    definitions: Vec<LocalTaskDefinition>,
    index: HashMap<String, usize>,
}

impl DefinitionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a definition.
    pub fn insert(&mut self, definition: LocalTaskDefinition) {
        if let Some(&position) = self.index.get(&definition.id) {
            self.definitions[position] = definition;
        } else {
            self.index.insert(definition.id.clone(), self.definitions.len());
            self.definitions.push(definition);
        }
    }

    /// Look up a definition by plugin id.
    pub fn get(&self, plugin_id: &str) -> Option<&LocalTaskDefinition> {
        self.index.get(plugin_id).map(|&position| &self.definitions[position])
    }

    /// Whether a plugin id is defined.
    pub fn contains(&self, plugin_id: &str) -> bool {
        self.index.contains_key(plugin_id)
    }

    /// Iterate in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &LocalTaskDefinition> {
        self.definitions.iter()
    }

    /// All plugin ids in discovery order.
    pub fn ids(&self) -> Vec<String> {
        self.definitions.iter().map(|definition| definition.id.clone()).collect()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl From<Vec<LocalTaskDefinition>> for DefinitionSet {
    fn from(definitions: Vec<LocalTaskDefinition>) -> Self {
        let mut set = Self::new();
        for definition in definitions {
            set.insert(definition);
        }
        set
    }
}

impl From<DefinitionSet> for Vec<LocalTaskDefinition> {
    fn from(set: DefinitionSet) -> Self {
        set.definitions
    }
}

impl FromIterator<LocalTaskDefinition> for DefinitionSet {
    fn from_iter<I: IntoIterator<Item = LocalTaskDefinition>>(iter: I) -> Self {
        let mut set = Self::new();
        for definition in iter {
            set.insert(definition);
        }
        set
    }
}
