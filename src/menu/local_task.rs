//! Local task instances and the factories that create them.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::definition::{LinkOptions, LocalTaskDefinition};
use crate::routing::{Request, Route, RouteParameters};

/// CSS class added to the options of an active tab.
pub const ACTIVE_CLASS: &str = "active";

/// Weight of a tab that is its own tab root and declares no weight.
pub const ROOT_TAB_WEIGHT: i64 = -10;

/// A live tab bound to one definition.
///
/// Instances are immutable once created; whether a tab renders as active is
/// decided by the caller and passed in to [`LocalTask::options`]. Every
/// method has a default implementation reading the definition, so custom
/// tasks only override what they compute differently.
pub trait LocalTask: Send + Sync {
    /// The definition the instance was created from.
    fn definition(&self) -> &LocalTaskDefinition;

    /// Plugin id.
    fn plugin_id(&self) -> &str {
        &self.definition().id
    }

    /// Route the tab links to.
    fn route_name(&self) -> &str {
        &self.definition().route_name
    }

    /// Route parameters for the link.
    ///
    /// Starts from the definition's parameters and fills each remaining
    /// variable of `route` from the request, raw variables first. With no
    /// route metadata only the definition's parameters are known.
    fn route_parameters(&self, request: &Request, route: Option<&Route>) -> RouteParameters {
        let mut parameters = self.definition().route_parameters.clone();
        if let Some(route) = route {
            for variable in route.variables() {
                if parameters.contains_key(&variable) {
                    continue;
                }
                if let Some(value) = request.parameter(&variable) {
                    parameters.insert(variable, value.to_string());
                }
            }
        }
        parameters
    }

    /// Title to display.
    fn title(&self, _request: &Request) -> String {
        self.definition().title.clone()
    }

    /// Link options; an active tab gets the `active` class.
    fn options(&self, _request: &Request, active: bool) -> LinkOptions {
        let mut options = self.definition().options.clone();
        if active {
            add_class(&mut options, ACTIVE_CLASS);
        }
        options
    }

    /// Sort weight.
    fn weight(&self) -> i64 {
        let definition = self.definition();
        match definition.weight {
            Some(weight) => weight,
            None if definition.id == definition.tab_root_id => ROOT_TAB_WEIGHT,
            None => 0,
        }
    }
}

/// Add `class` to `options.attributes.class` unless it is already present.
///
/// A string-valued class attribute is promoted to a list.
pub fn add_class(options: &mut LinkOptions, class: &str) {
    let attributes = options
        .entry("attributes")
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    if !attributes.is_object() {
        *attributes = Value::Object(serde_json::Map::new());
    }
    let Value::Object(attributes) = attributes else {
        return;
    };

    let classes = attributes.entry("class").or_insert_with(|| Value::Array(Vec::new()));
    match classes {
        Value::Array(list) => {
            if !list.iter().any(|c| c.as_str() == Some(class)) {
                list.push(Value::String(class.to_string()));
            }
        }
        Value::String(existing) => {
            let existing = std::mem::take(existing);
            *classes = if existing.split_whitespace().any(|c| c == class) {
                Value::Array(vec![Value::String(existing)])
            } else {
                Value::Array(vec![Value::String(existing), Value::String(class.to_string())])
            };
        }
        other => *other = Value::Array(vec![Value::String(class.to_string())]),
    }
}

/// The task used for every plugin without its own factory.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTaskDefault {
    definition: LocalTaskDefinition,
}

impl LocalTaskDefault {
    /// Wrap a definition.
    pub fn new(definition: LocalTaskDefinition) -> Self {
        Self {
            definition,
        }
    }
}

impl LocalTask for LocalTaskDefault {
    fn definition(&self) -> &LocalTaskDefinition {
        &self.definition
    }
}

/// Creates a task instance from its definition.
pub type TaskFactory = Arc<dyn Fn(LocalTaskDefinition) -> Box<dyn LocalTask> + Send + Sync>;

/// Factories keyed by plugin id, plus the default factory.
#[derive(Clone)]
pub struct TaskFactoryRegistry {
    factories: HashMap<String, TaskFactory>,
    default_factory: TaskFactory,
}

impl Default for TaskFactoryRegistry {
    fn default() -> Self {
        Self::new(Arc::new(|definition: LocalTaskDefinition| -> Box<dyn LocalTask> {
            Box::new(LocalTaskDefault::new(definition))
        }))
    }
}

impl std::fmt::Debug for TaskFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("TaskFactoryRegistry").field("factories", &ids).finish_non_exhaustive()
    }
}

impl TaskFactoryRegistry {
    /// A registry with `default_factory` and no per-plugin factories.
    pub fn new(default_factory: TaskFactory) -> Self {
        Self {
            factories: HashMap::new(),
            default_factory,
        }
    }

    /// Register a factory for one plugin id.
    pub fn register(&mut self, plugin_id: impl Into<String>, factory: TaskFactory) {
        self.factories.insert(plugin_id.into(), factory);
    }

    /// Builder-style [`TaskFactoryRegistry::register`].
    #[must_use]
    pub fn with_factory(mut self, plugin_id: impl Into<String>, factory: TaskFactory) -> Self {
        self.register(plugin_id, factory);
        self
    }

    /// Whether `plugin_id` has its own factory.
    pub fn has_factory(&self, plugin_id: &str) -> bool {
        self.factories.contains_key(plugin_id)
    }

    /// Instantiate a task for `definition`.
    pub fn create(&self, definition: LocalTaskDefinition) -> Box<dyn LocalTask> {
        let factory = self.factories.get(&definition.id).unwrap_or(&self.default_factory);
        factory(definition)
    }
}
