//! Collaborator doubles for the local task manager.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::CmsError;
use crate::routing::{AccessCheck, MemoryRouteProvider, Route, RouteParameters, RouteProvider};

/// Route provider that counts batch lookups.
///
/// Single-route lookups pass straight through and are not counted.
#[derive(Debug, Default)]
pub struct CountingRouteProvider {
    inner: MemoryRouteProvider,
    batch_calls: AtomicUsize,
    names_requested: AtomicUsize,
}

impl CountingRouteProvider {
    /// Wrap `inner`.
    pub fn new(inner: MemoryRouteProvider) -> Self {
        Self {
            inner,
            batch_calls: AtomicUsize::new(0),
            names_requested: AtomicUsize::new(0),
        }
    }

    /// Provider knowing one `/<name>` route per name, open to everyone.
    pub fn open_routes(names: &[&str]) -> Self {
        let mut inner = MemoryRouteProvider::new();
        for name in names {
            inner.add(Route::new(*name, format!("/{name}")).with_requirement("_access", "TRUE"));
        }
        Self::new(inner)
    }

    /// Number of `get_routes_by_names` calls so far.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Total number of names passed to `get_routes_by_names`.
    pub fn names_requested(&self) -> usize {
        self.names_requested.load(Ordering::SeqCst)
    }

    /// Reset the counters.
    pub fn reset(&self) {
        self.batch_calls.store(0, Ordering::SeqCst);
        self.names_requested.store(0, Ordering::SeqCst);
    }
}

impl RouteProvider for CountingRouteProvider {
    fn get_routes_by_names(&self, names: &[String]) -> HashMap<String, Route> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.names_requested.fetch_add(names.len(), Ordering::SeqCst);
        self.inner.get_routes_by_names(names)
    }

    fn get_route_by_name(&self, name: &str) -> Result<Route, CmsError> {
        self.inner.get_route_by_name(name)
    }
}

/// Access checker driven by allow and deny lists of route names.
///
/// The deny list wins over the allow list; routes on neither list get the
/// default decision.
#[derive(Debug, Clone, Default)]
pub struct StaticAccess {
    default_allow: bool,
    allow: BTreeSet<String>,
    deny: BTreeSet<String>,
}

impl StaticAccess {
    /// Allow every route not explicitly denied.
    pub fn allow_all() -> Self {
        Self {
            default_allow: true,
            ..Self::default()
        }
    }

    /// Deny every route not explicitly allowed.
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// Allow `route_name`.
    #[must_use]
    pub fn allow(mut self, route_name: &str) -> Self {
        self.allow.insert(route_name.to_string());
        self
    }

    /// Deny `route_name`.
    #[must_use]
    pub fn deny(mut self, route_name: &str) -> Self {
        self.deny.insert(route_name.to_string());
        self
    }
}

impl AccessCheck for StaticAccess {
    fn check_named_route(&self, route_name: &str, _parameters: &RouteParameters) -> bool {
        if self.deny.contains(route_name) {
            return false;
        }
        self.allow.contains(route_name) || self.default_allow
    }
}
