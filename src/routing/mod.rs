//! Route metadata, request context and access checks.
//!
//! These are the collaborators the local task manager calls into. Only the
//! observable contract is modelled: routes are looked up by name (in batch
//! when possible), requests carry the attributes parameters are pulled from,
//! and access is a plain yes/no per route and parameter set.
//!
//! - [`Route`] - name, path pattern, defaults and requirements
//! - [`RouteProvider`] - batch and single lookup by name
//! - [`MemoryRouteProvider`] - provider backed by a map, loadable from YAML
//! - [`Request`] - the current route and its attributes
//! - [`AccessCheck`] / [`PermissionAccessManager`] - route access decisions

mod access;
mod provider;

pub use access::{AccessCheck, Account, PermissionAccessManager};
pub use provider::{MemoryRouteProvider, RouteProvider};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Route parameters keyed by slug name.
pub type RouteParameters = BTreeMap<String, String>;

static PATH_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    // Slugs are identifiers wrapped in braces, e.g. /node/{node}/edit
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("path variable pattern is valid")
});

/// Route metadata as resolved by a [`RouteProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Machine name of the route, e.g. `node.view`.
    #[serde(default)]
    pub name: String,
    /// Path pattern with `{slug}` placeholders.
    pub path: String,
    /// Default values, e.g. `_title`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, String>,
    /// Access requirements, e.g. `_permission` or `_access`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requirements: BTreeMap<String, String>,
}

impl Route {
    /// Create a route with no defaults or requirements.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            defaults: BTreeMap::new(),
            requirements: BTreeMap::new(),
        }
    }

    /// Add a requirement (builder style).
    #[must_use]
    pub fn with_requirement(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.requirements.insert(key.into(), value.into());
        self
    }

    /// Add a default (builder style).
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Slug names appearing in the path pattern, in path order.
    pub fn variables(&self) -> Vec<String> {
        PATH_VARIABLE.captures_iter(&self.path).map(|caps| caps[1].to_string()).collect()
    }
}

/// The request a tab list is being built for.
///
/// `attributes` hold the upcast values of the matched route (for example the
/// loaded node id under `node`); `raw_variables`, when present, hold the
/// original path strings and take precedence when filling route parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Name of the matched route.
    pub route_name: Option<String>,
    /// Request attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Raw path variables as matched, before conversion.
    #[serde(default)]
    pub raw_variables: Option<BTreeMap<String, String>>,
}

impl Request {
    /// Create a request for a matched route.
    pub fn for_route(route_name: impl Into<String>) -> Self {
        Self {
            route_name: Some(route_name.into()),
            ..Self::default()
        }
    }

    /// Add an attribute (builder style).
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add a raw path variable (builder style).
    #[must_use]
    pub fn with_raw_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw_variables.get_or_insert_with(BTreeMap::new).insert(key.into(), value.into());
        self
    }

    /// Look up a parameter value: raw variables first, then attributes.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.raw_variables
            .as_ref()
            .and_then(|raw| raw.get(name))
            .or_else(|| self.attributes.get(name))
            .map(String::as_str)
    }

    /// Whether every `(key, value)` pair of `parameters` is also an attribute
    /// of this request with the same value.
    pub fn matches_parameters(&self, parameters: &RouteParameters) -> bool {
        parameters.iter().all(|(key, value)| self.attributes.get(key) == Some(value))
    }
}
