//! cmscore - content framework core
//!
//! Building blocks of a content management framework: the local task (tab)
//! manager that turns module definitions into the access-checked tabs of a
//! page, the controller behind entity add/edit forms, block configuration
//! entities, and the shared logic of option widgets and taxonomy term
//! formatters.
//!
//! # Architecture Overview
//!
//! Local tasks are declared per module in `<module>.local_tasks.yml` files.
//! Discovery collects them, the manager fills defaults and caches them per
//! language, and for each route a hierarchy of tab groups is computed once and
//! cached under a tag. Rendering a route walks that hierarchy, instantiates
//! tasks through pluggable factories, resolves all linked routes in one batch
//! and drops tabs the current user may not reach.
//!
//! # Core Modules
//!
//! ## Local Tasks
//! - [`menu`] - definitions, discovery, hierarchy, rendering and validation
//! - [`routing`] - routes, requests and access checks the manager calls into
//! - [`cache`] - tagged cache backend for definitions and hierarchies
//!
//! ## Entities
//! - [`entity`] - entity traits and the entity form controller
//! - [`block`] - block placements, custom blocks and block types
//! - [`field`] - option widgets and taxonomy term formatters
//!
//! ## Supporting Modules
//! - [`cli`] - the `cmscore` command-line interface
//! - [`config`] - settings file loading
//! - [`core`] - error types and user-facing error context
//!
//! # Example
//!
//! ```rust,no_run
//! use cmscore::cache::MemoryBackend;
//! use cmscore::menu::{LocalTaskManager, YamlDiscovery};
//! use cmscore::routing::{Account, MemoryRouteProvider, PermissionAccessManager, Request};
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let routes = Arc::new(MemoryRouteProvider::load(Path::new("routing.yml"))?);
//! let account = Account::with_permissions(1, ["access content"]);
//! let access = Arc::new(PermissionAccessManager::new(routes.clone(), account));
//! let request = Request::for_route("entity.node.canonical").with_attribute("node", "7");
//!
//! let mut manager = LocalTaskManager::new(
//!     Box::new(YamlDiscovery::new(vec![PathBuf::from("modules")])),
//!     Arc::new(MemoryBackend::new()),
//!     routes,
//!     access,
//!     request,
//! );
//! let build = manager.get_tasks_build("entity.node.canonical");
//! println!("{}", serde_json::to_string_pretty(&build)?);
//! # Ok(())
//! # }
//! ```

pub mod block;
pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod entity;
pub mod field;
pub mod menu;
pub mod routing;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
