//! Command-line interface for cmscore.
//!
//! The CLI loads local task definitions from module directories and a routes
//! file, then renders or inspects them:
//!
//! - `tasks` - print the access-checked tabs of a route
//! - `hierarchy` - print the cached hierarchy entry of a route as JSON
//! - `validate` - report broken or inconsistent definitions
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log at debug level / disable logging
//! - `--config PATH` - settings file (defaults to `CMSCORE_CONFIG`, then the
//!   user config directory)
//! - `--modules DIR` - module directory, repeatable; replaces `module_dirs`
//! - `--routes FILE` - routes YAML; replaces `routes_file`
//!
//! `RUST_LOG` overrides the log level chosen by the flags.
//!
//! # Examples
//!
//! ```bash
//! cmscore --modules core/modules tasks --route entity.node.edit_form --attr node=7 \
//!     --routes routing.yml --permission "edit any content"
//! cmscore --modules core/modules hierarchy --route user.page
//! cmscore --modules core/modules validate --strict
//! ```

pub mod common;
mod hierarchy;
mod tasks;
mod validate;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use common::Overrides;

/// Output format of the reporting commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Runtime configuration derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level; `None` disables logging
    pub log_level: Option<String>,
    pub overrides: Overrides,
}

/// Top-level parser.
#[derive(Parser, Debug)]
#[command(
    name = "cmscore",
    about = "Resolve and inspect local task (tab) definitions",
    version,
    long_about = "cmscore discovers <module>.local_tasks.yml definitions, rebuilds the tab hierarchy of a route and renders it with access checks."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable logging and progress output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Module directory to discover definitions in (repeatable)
    #[arg(long = "modules", global = true, value_name = "DIR")]
    modules: Vec<PathBuf>,

    /// Routes YAML file
    #[arg(long, global = true, value_name = "FILE")]
    routes: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the rendered tabs of a route
    Tasks(tasks::TasksCommand),
    /// Print the hierarchy entry of a route
    Hierarchy(hierarchy::HierarchyCommand),
    /// Validate local task definitions
    Validate(validate::ValidateCommand),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(config.log_level.as_deref());
        self.execute_with_config(config).await
    }

    /// Derive the runtime configuration from the flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            overrides: Overrides {
                config: self.config.clone(),
                modules: self.modules.clone(),
                routes: self.routes.clone(),
            },
        }
    }

    /// Run the selected command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Tasks(cmd) => cmd.execute(&config.overrides).await,
            Commands::Hierarchy(cmd) => cmd.execute(&config.overrides).await,
            Commands::Validate(cmd) => cmd.execute(&config.overrides, self.quiet).await,
        }
    }
}

/// Install the global subscriber, logging to stderr.
///
/// `RUST_LOG` wins over `level`; with neither, nothing is installed.
fn init_logging(level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if let Some(level) = level {
        EnvFilter::new(level)
    } else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
