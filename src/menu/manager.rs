//! The local task manager.
//!
//! Owns the definition registry and the per-route instance cache, and
//! drives the pipeline definitions → hierarchy → cache → instances → access
//! filter → render list.
//!
//! A manager is scoped to one request: the instance cache is plain mutable
//! state behind `&mut self` and is never shared between threads. The cache
//! backend behind it is shared, and every write to it is a whole-value set
//! of data recomputed from immutable definitions, so concurrent writers
//! always converge.

use std::collections::HashMap;
use std::sync::Arc;

use super::definition::{DefinitionSet, LocalTaskDefinition, process_definition};
use super::discovery::Discovery;
use super::hierarchy::{HierarchyEntry, WalkMode, build_hierarchy};
use super::local_task::{LocalTask, TaskFactoryRegistry};
use super::render::{TaskBuild, assemble};
use super::tree::LocalTaskTree;
use crate::cache::{CacheBackend, Expire};
use crate::config::Settings;
use crate::core::CmsError;
use crate::routing::{AccessCheck, Request, RouteProvider};

/// Namespace of every cache entry written by the manager.
pub const CACHE_PREFIX: &str = "local_task";

/// Tag on every cache entry; invalidating it drops all of them.
pub const CACHE_TAG: &str = "local_task";

/// Default language code for cache keys.
pub const DEFAULT_LANGCODE: &str = "en";

/// Resolves and renders local tasks.
pub struct LocalTaskManager {
    discovery: Box<dyn Discovery>,
    cache: Arc<dyn CacheBackend>,
    routes: Arc<dyn RouteProvider>,
    access: Arc<dyn AccessCheck>,
    request: Request,
    factories: TaskFactoryRegistry,
    langcode: String,
    walk_mode: WalkMode,
    definitions: Option<DefinitionSet>,
    rejected: Vec<CmsError>,
    trees: HashMap<String, LocalTaskTree>,
}

impl LocalTaskManager {
    /// Create a manager with the default task factory, language and walk mode.
    pub fn new(
        discovery: Box<dyn Discovery>,
        cache: Arc<dyn CacheBackend>,
        routes: Arc<dyn RouteProvider>,
        access: Arc<dyn AccessCheck>,
        request: Request,
    ) -> Self {
        Self {
            discovery,
            cache,
            routes,
            access,
            request,
            factories: TaskFactoryRegistry::default(),
            langcode: DEFAULT_LANGCODE.to_string(),
            walk_mode: WalkMode::default(),
            definitions: None,
            rejected: Vec::new(),
            trees: HashMap::new(),
        }
    }

    /// Use `factories` to instantiate tasks.
    #[must_use]
    pub fn with_factories(mut self, factories: TaskFactoryRegistry) -> Self {
        self.factories = factories;
        self
    }

    /// Language the cache entries are keyed by.
    #[must_use]
    pub fn with_language(mut self, langcode: impl Into<String>) -> Self {
        self.langcode = langcode.into();
        self
    }

    /// How tab groups are walked.
    #[must_use]
    pub fn with_walk_mode(mut self, walk_mode: WalkMode) -> Self {
        self.walk_mode = walk_mode;
        self
    }

    /// Apply the language and walk mode of `settings`.
    #[must_use]
    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_language(settings.language.clone()).with_walk_mode(settings.walk_mode)
    }

    /// The request tasks are rendered for.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Replace the request. Materialized trees do not depend on it and are kept.
    pub fn set_request(&mut self, request: Request) {
        self.request = request;
    }

    /// The configured walk mode.
    pub fn walk_mode(&self) -> WalkMode {
        self.walk_mode
    }

    /// Cache id of the definition set.
    pub fn cache_key(&self) -> String {
        format!("{CACHE_PREFIX}:{}", self.langcode)
    }

    /// Cache id of the hierarchy of `route_name`.
    pub fn route_cache_key(&self, route_name: &str) -> String {
        format!("{CACHE_PREFIX}:{}:{route_name}", self.langcode)
    }

    /// All valid definitions, in discovery order.
    ///
    /// Loaded once per manager: from memory, else from the cache backend,
    /// else by running discovery and processing every definition.
    pub fn get_definitions(&mut self) -> &DefinitionSet {
        if self.definitions.is_none() {
            let definitions = self.load_definitions();
            self.definitions = Some(definitions);
        }
        self.definitions.get_or_insert_default()
    }

    /// Problems found the last time discovery ran.
    ///
    /// Empty when the definitions came from the cache backend.
    pub fn rejected(&self) -> &[CmsError] {
        &self.rejected
    }

    /// One definition by plugin id.
    pub fn get_definition(&mut self, plugin_id: &str) -> Result<LocalTaskDefinition, CmsError> {
        self.get_definitions().get(plugin_id).cloned().ok_or_else(|| CmsError::UnknownPlugin {
            plugin_id: plugin_id.to_string(),
        })
    }

    /// Instantiate the task for `plugin_id`.
    pub fn create_instance(&mut self, plugin_id: &str) -> Result<Box<dyn LocalTask>, CmsError> {
        let definition = self.get_definition(plugin_id)?;
        Ok(self.factories.create(definition))
    }

    /// Drop the in-memory and cached definitions along with every cached
    /// route hierarchy.
    pub fn clear_cached_definitions(&mut self) {
        self.definitions = None;
        self.rejected.clear();
        self.trees.clear();
        self.cache.invalidate_tags(&[CACHE_TAG]);
        tracing::debug!("Cleared local task definitions");
    }

    /// The hierarchy entry of `route_name`, from the cache backend or freshly built.
    pub fn hierarchy_for_route(&mut self, route_name: &str) -> HierarchyEntry {
        let cid = self.route_cache_key(route_name);

        if let Some(item) = self.cache.get(&cid) {
            match serde_json::from_value::<HierarchyEntry>(item.data) {
                Ok(entry) => {
                    tracing::debug!("Local task hierarchy cache hit for '{route_name}'");
                    return entry;
                }
                Err(e) => {
                    let error = CmsError::CacheDecodeError {
                        cid: cid.clone(),
                        reason: e.to_string(),
                    };
                    tracing::warn!("{error}; rebuilding");
                }
            }
        } else {
            tracing::debug!("Local task hierarchy cache miss for '{route_name}'");
        }

        let entry = build_hierarchy(route_name, self.get_definitions());
        match serde_json::to_value(&entry) {
            Ok(data) => self.cache.set(&cid, data, Expire::Permanent, &[CACHE_TAG]),
            Err(e) => tracing::warn!("Could not cache local task hierarchy for '{route_name}': {e}"),
        }
        entry
    }

    /// The materialized task tree of `route_name`, memoized per manager.
    pub fn get_local_tasks_for_route(&mut self, route_name: &str) -> &LocalTaskTree {
        if !self.trees.contains_key(route_name) {
            let entry = self.hierarchy_for_route(route_name);
            let tree = LocalTaskTree::materialize(route_name, &entry, self.walk_mode, &self.factories);
            self.trees.insert(route_name.to_string(), tree);
        }
        self.trees.entry(route_name.to_string()).or_default()
    }

    /// Access-checked render list of the tabs of `route_name`.
    pub fn get_tasks_build(&mut self, route_name: &str) -> TaskBuild {
        self.get_local_tasks_for_route(route_name);
        let Some(tree) = self.trees.get(route_name) else {
            return TaskBuild::default();
        };
        assemble(tree, &self.request, self.routes.as_ref(), self.access.as_ref())
    }

    /// Title of `task` for the current request.
    pub fn get_title(&self, task: &dyn LocalTask) -> String {
        task.title(&self.request)
    }

    fn load_definitions(&mut self) -> DefinitionSet {
        let cid = self.cache_key();

        if let Some(item) = self.cache.get(&cid) {
            match serde_json::from_value::<DefinitionSet>(item.data) {
                Ok(definitions) => {
                    tracing::debug!("Loaded {} local task definitions from cache", definitions.len());
                    return definitions;
                }
                Err(e) => tracing::warn!(
                    "{}; rediscovering",
                    CmsError::CacheDecodeError {
                        cid: cid.clone(),
                        reason: e.to_string(),
                    }
                ),
            }
        }

        let outcome = self.discovery.discover();
        self.rejected = outcome.errors;
        for error in &self.rejected {
            tracing::error!("{error}");
        }

        let mut definitions = DefinitionSet::new();
        for definition in outcome.definitions {
            let plugin_id = definition.id.clone();
            match process_definition(&plugin_id, definition) {
                Ok(definition) => definitions.insert(definition),
                Err(error) => {
                    tracing::error!("{error}");
                    self.rejected.push(error);
                }
            }
        }
        tracing::debug!(
            "Discovered {} local task definitions ({} rejected)",
            definitions.len(),
            self.rejected.len()
        );

        match serde_json::to_value(&definitions) {
            Ok(data) => self.cache.set(&cid, data, Expire::Permanent, &[CACHE_TAG]),
            Err(e) => tracing::warn!("Could not cache local task definitions: {e}"),
        }
        definitions
    }
}
