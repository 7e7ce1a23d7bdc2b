//! Shared setup for the commands: settings, routes and the task manager.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::MemoryBackend;
use crate::config::Settings;
use crate::core::CmsError;
use crate::menu::{LocalTaskManager, YamlDiscovery};
use crate::routing::{AccessCheck, MemoryRouteProvider, Request};

/// Command-line overrides of the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub modules: Vec<PathBuf>,
    pub routes: Option<PathBuf>,
}

/// Everything a command needs to build a manager.
pub struct Environment {
    pub settings: Settings,
    pub routes: Arc<MemoryRouteProvider>,
    /// Whether routes were loaded from a file.
    pub has_routes: bool,
}

impl Environment {
    /// Load settings, apply `overrides` and read the routes file.
    pub async fn load(overrides: &Overrides) -> Result<Self> {
        let mut settings = Settings::load_with_optional(overrides.config.clone()).await?;
        if !overrides.modules.is_empty() {
            settings.module_dirs = overrides.modules.clone();
        }
        if overrides.routes.is_some() {
            settings.routes_file = overrides.routes.clone();
        }

        if settings.module_dirs.is_empty() {
            return Err(CmsError::ConfigError {
                message: "no module directories configured".to_string(),
            }
            .into());
        }

        let (routes, has_routes) = match &settings.routes_file {
            Some(path) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read routes file: {}", path.display()))?;
                let routes = MemoryRouteProvider::from_yaml_str(&content)
                    .with_context(|| format!("Failed to parse routes file: {}", path.display()))?;
                tracing::debug!("Loaded {} routes from {}", routes.len(), path.display());
                (routes, true)
            }
            None => (MemoryRouteProvider::new(), false),
        };

        Ok(Self {
            settings,
            routes: Arc::new(routes),
            has_routes,
        })
    }

    /// A manager over the configured modules for `request`.
    pub fn manager(&self, access: Arc<dyn AccessCheck>, request: Request) -> LocalTaskManager {
        LocalTaskManager::new(
            Box::new(YamlDiscovery::new(self.settings.module_dirs.clone())),
            Arc::new(MemoryBackend::new()),
            self.routes.clone(),
            access,
            request,
        )
        .with_settings(&self.settings)
    }
}

/// Parse a `key=value` argument.
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{input}'")),
    }
}

/// Collect `key=value` pairs into a map; later keys win.
pub fn into_map(pairs: &[(String, String)]) -> BTreeMap<String, String> {
    pairs.iter().cloned().collect()
}
