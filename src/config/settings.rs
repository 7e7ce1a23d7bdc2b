//! Runtime settings for the local task manager and the CLI.
//!
//! Settings are stored as TOML. Every field has a default, so an absent file
//! or an empty file both yield a usable configuration.
//!
//! ```toml
//! language = "en"
//! walk_mode = "single-branch"
//! module_dirs = ["core/modules", "modules"]
//! routes_file = "routing.yml"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::menu::WalkMode;

/// Environment variable that overrides the default settings location.
pub const CONFIG_ENV_VAR: &str = "CMSCORE_CONFIG";

fn default_language() -> String {
    "en".to_string()
}

/// Settings consumed by [`LocalTaskManager`](crate::menu::LocalTaskManager) and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Language code used to partition cache entries.
    #[serde(default = "default_language")]
    pub language: String,

    /// How the tab tree walk descends past the first level.
    #[serde(default)]
    pub walk_mode: WalkMode,

    /// Directories searched for `<module>.local_tasks.yml` files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub module_dirs: Vec<PathBuf>,

    /// YAML file of route metadata (name → path, defaults, requirements).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: default_language(),
            walk_mode: WalkMode::default(),
            module_dirs: Vec::new(),
            routes_file: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional path.
    ///
    /// Resolution order: the explicit `path`, then `CMSCORE_CONFIG`, then
    /// [`Settings::default_path`]. A missing file yields default settings;
    /// an explicit path that does not exist is an error.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(&path).await;
        }

        let path = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(value) => PathBuf::from(value),
            None => match Self::default_path() {
                Ok(path) => path,
                Err(_) => return Ok(Self::default()),
            },
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let mut settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        // Relative paths in the file are relative to the file itself
        if let Some(base) = path.parent() {
            settings.resolve_relative_to(base);
        }

        Ok(settings)
    }

    /// Get the default settings path: `<config dir>/cmscore/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine configuration directory"))?;
        Ok(config_dir.join("cmscore").join("config.toml"))
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for dir in &mut self.module_dirs {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        if let Some(routes) = &mut self.routes_file
            && routes.is_relative()
        {
            *routes = base.join(&*routes);
        }
    }
}
