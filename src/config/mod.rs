//! Configuration management for cmscore
//!
//! [`Settings`] feed the local task manager and the CLI. Relative paths in a
//! settings file are resolved against the file's directory.
//!
//! # Settings File
//!
//! **Location:**
//! - `--config <path>` on the command line, else
//! - `CMSCORE_CONFIG`, else
//! - `<platform config dir>/cmscore/config.toml`
//!
//! A missing default file is not an error; built-in defaults apply.
//!
//! ```toml
//! language = "en"
//! walk_mode = "single-branch"   # or "full"
//! module_dirs = ["core/modules"]
//! routes_file = "routing.yml"
//! ```

mod settings;

pub use settings::{CONFIG_ENV_VAR, Settings};
