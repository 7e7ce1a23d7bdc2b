//! Discovery of local task definitions.
//!
//! Definitions come from a [`Discovery`] implementation:
//!
//! - [`YamlDiscovery`] reads `<module>.local_tasks.yml` files under a list of
//!   module directories
//! - [`StaticDiscovery`] serves a fixed list (programmatic registration, tests)
//! - [`DerivativeDiscovery`] decorates another discovery and expands
//!   definitions naming a `deriver` into one definition per derivative
//!
//! Discovery never aborts on a bad file or entry. Failures are returned next
//! to the definitions that did load, so one broken module cannot hide every
//! other tab.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::definition::LocalTaskDefinition;
use crate::core::CmsError;

/// File name suffix of local task definition files.
pub const DEFINITION_FILE_SUFFIX: &str = ".local_tasks.yml";

/// What a discovery pass produced.
#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    /// Raw (unprocessed) definitions in discovery order.
    pub definitions: Vec<LocalTaskDefinition>,
    /// Files or entries that could not be loaded.
    pub errors: Vec<CmsError>,
}

/// Source of raw local task definitions.
pub trait Discovery: Send + Sync {
    /// Discover all definitions.
    fn discover(&self) -> DiscoveryOutcome;
}

/// Serves a fixed list of definitions.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    definitions: Vec<LocalTaskDefinition>,
}

impl StaticDiscovery {
    /// Create a discovery returning `definitions` as-is.
    pub fn new(definitions: Vec<LocalTaskDefinition>) -> Self {
        Self {
            definitions,
        }
    }
}

impl Discovery for StaticDiscovery {
    fn discover(&self) -> DiscoveryOutcome {
        DiscoveryOutcome {
            definitions: self.definitions.clone(),
            errors: Vec::new(),
        }
    }
}

/// Reads `<module>.local_tasks.yml` files.
///
/// Each file is a YAML map of plugin id to definition body. The map key
/// becomes the definition id and the file's module name its provider.
/// Directories are scanned in the given order; within a directory, files are
/// visited in sorted path order so discovery is deterministic.
#[derive(Debug, Clone)]
pub struct YamlDiscovery {
    directories: Vec<PathBuf>,
}

impl YamlDiscovery {
    /// Create a discovery over `directories`.
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self {
            directories,
        }
    }

    /// Parse one definition file's content.
    ///
    /// Returns the definitions that parsed and an error for each entry that
    /// did not. A file that is not a YAML map is a single
    /// [`CmsError::DiscoveryFailed`].
    pub fn parse_file(
        path: &Path,
        provider: &str,
        content: &str,
    ) -> (Vec<LocalTaskDefinition>, Vec<CmsError>) {
        let mut definitions = Vec::new();
        let mut errors = Vec::new();

        let mapping: serde_yaml::Mapping = match serde_yaml::from_str(content) {
            Ok(serde_yaml::Value::Mapping(mapping)) => mapping,
            Ok(serde_yaml::Value::Null) => return (definitions, errors),
            Ok(_) => {
                errors.push(CmsError::DiscoveryFailed {
                    path: path.display().to_string(),
                    reason: "top level must be a map of plugin id to definition".to_string(),
                });
                return (definitions, errors);
            }
            Err(e) => {
                errors.push(CmsError::DiscoveryFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
                return (definitions, errors);
            }
        };

        for (key, body) in mapping {
            let Some(plugin_id) = key.as_str().map(str::to_string) else {
                errors.push(CmsError::DiscoveryFailed {
                    path: path.display().to_string(),
                    reason: format!("plugin id {key:?} is not a string"),
                });
                continue;
            };

            // An empty body is valid YAML (`id:`) and means "all defaults"
            let body = if body.is_null() {
                serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
            } else {
                body
            };

            match serde_yaml::from_value::<LocalTaskDefinition>(body) {
                Ok(mut definition) => {
                    definition.id = plugin_id;
                    if definition.provider.is_none() {
                        definition.provider = Some(provider.to_string());
                    }
                    definitions.push(definition);
                }
                Err(e) => errors.push(CmsError::InvalidDefinition {
                    plugin_id,
                    reason: format!("could not be parsed: {e}"),
                }),
            }
        }

        (definitions, errors)
    }

    fn definition_files(&self) -> Vec<(PathBuf, String)> {
        let mut files = Vec::new();
        for directory in &self.directories {
            let mut found: Vec<(PathBuf, String)> = WalkDir::new(directory)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry under {}: {e}", directory.display());
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .filter_map(|entry| {
                    let name = entry.file_name().to_str()?;
                    let module = name.strip_suffix(DEFINITION_FILE_SUFFIX)?;
                    if module.is_empty() {
                        return None;
                    }
                    Some((entry.path().to_path_buf(), module.to_string()))
                })
                .collect();
            found.sort();
            files.extend(found);
        }
        files
    }
}

impl Discovery for YamlDiscovery {
    fn discover(&self) -> DiscoveryOutcome {
        let mut outcome = DiscoveryOutcome::default();

        for directory in &self.directories {
            if !directory.is_dir() {
                outcome.errors.push(CmsError::DiscoveryFailed {
                    path: directory.display().to_string(),
                    reason: "not a directory".to_string(),
                });
            }
        }

        for (path, module) in self.definition_files() {
            tracing::debug!("Reading local tasks from {}", path.display());
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    outcome.errors.push(CmsError::DiscoveryFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let (definitions, errors) = Self::parse_file(&path, &module, &content);
            outcome.definitions.extend(definitions);
            outcome.errors.extend(errors);
        }

        outcome
    }
}

/// Expands one base definition into `(derivative id, definition)` pairs.
///
/// The returned definitions usually start as a clone of the base; their `id`
/// is overwritten with `<base id>:<derivative id>`.
pub type DeriverFn = Arc<dyn Fn(&LocalTaskDefinition) -> Vec<(String, LocalTaskDefinition)> + Send + Sync>;

/// Decorates a discovery with derivative expansion.
pub struct DerivativeDiscovery {
    inner: Box<dyn Discovery>,
    derivers: HashMap<String, DeriverFn>,
}

impl DerivativeDiscovery {
    /// Wrap `inner` with no derivers registered.
    pub fn new(inner: Box<dyn Discovery>) -> Self {
        Self {
            inner,
            derivers: HashMap::new(),
        }
    }

    /// Register a deriver under `name`.
    #[must_use]
    pub fn with_deriver(mut self, name: impl Into<String>, deriver: DeriverFn) -> Self {
        self.derivers.insert(name.into(), deriver);
        self
    }
}

impl Discovery for DerivativeDiscovery {
    fn discover(&self) -> DiscoveryOutcome {
        let DiscoveryOutcome {
            definitions,
            mut errors,
        } = self.inner.discover();

        let mut expanded = Vec::with_capacity(definitions.len());
        for base in definitions {
            let Some(name) = base.deriver.clone() else {
                expanded.push(base);
                continue;
            };

            let Some(deriver) = self.derivers.get(&name) else {
                errors.push(CmsError::UnknownDeriver {
                    plugin_id: base.id.clone(),
                    deriver: name,
                });
                continue;
            };

            let derivatives = deriver(&base);
            tracing::debug!("Deriver '{name}' produced {} task(s) from {}", derivatives.len(), base.id);
            for (derivative_id, mut derivative) in derivatives {
                derivative.id = format!("{}:{derivative_id}", base.id);
                derivative.deriver = None;
                if derivative.provider.is_none() {
                    derivative.provider = base.provider.clone();
                }
                expanded.push(derivative);
            }
        }

        DiscoveryOutcome {
            definitions: expanded,
            errors,
        }
    }
}
