//! Route lookup by name.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::core::CmsError;

use super::Route;

/// Resolves route metadata by name.
///
/// `get_routes_by_names` is the batch entry point the tab renderer relies on
/// to avoid one lookup per tab. Unknown names are simply absent from the
/// result; that is not an error.
///
/// `get_route_by_name` must not go through the batch path: access checks call
/// it once per rendered tab.
pub trait RouteProvider: Send + Sync {
    /// Resolve every known name in `names`.
    fn get_routes_by_names(&self, names: &[String]) -> HashMap<String, Route>;

    /// Resolve a single route.
    fn get_route_by_name(&self, name: &str) -> Result<Route, CmsError>;
}

/// Route provider backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouteProvider {
    routes: HashMap<String, Route>,
}

impl MemoryRouteProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route, keyed by its name.
    pub fn add(&mut self, route: Route) {
        self.routes.insert(route.name.clone(), route);
    }

    /// Builder-style [`MemoryRouteProvider::add`].
    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.add(route);
        self
    }

    /// Parse a YAML map of route name to `{path, defaults, requirements}`.
    ///
    /// ```yaml
    /// node.view:
    ///   path: /node/{node}
    ///   requirements:
    ///     _permission: access content
    /// ```
    pub fn from_yaml_str(content: &str) -> Result<Self, CmsError> {
        let parsed: BTreeMap<String, Route> = serde_yaml::from_str(content)?;
        let mut provider = Self::new();
        for (name, mut route) in parsed {
            route.name = name;
            provider.add(route);
        }
        Ok(provider)
    }

    /// Load routes from a YAML file.
    pub fn load(path: &Path) -> Result<Self, CmsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| CmsError::DiscoveryFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Number of known routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are known.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over all known route names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

impl RouteProvider for MemoryRouteProvider {
    fn get_routes_by_names(&self, names: &[String]) -> HashMap<String, Route> {
        let mut found = HashMap::with_capacity(names.len());
        for name in names {
            match self.routes.get(name) {
                Some(route) => {
                    found.insert(name.clone(), route.clone());
                }
                None => tracing::debug!("Route '{name}' not found"),
            }
        }
        found
    }

    fn get_route_by_name(&self, name: &str) -> Result<Route, CmsError> {
        self.routes.get(name).cloned().ok_or_else(|| CmsError::RouteNotFound {
            name: name.to_string(),
        })
    }
}
