//! Check local task definitions for problems.
//!
//! Reports definitions that failed to load, references to unknown tab roots
//! or parents (with "did you mean" suggestions), links to routes missing
//! from the routes file, and loops between parent links.
//!
//! Errors always fail the command. Warnings only fail it with `--strict`.

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::sync::Arc;

use super::OutputFormat;
use super::common::{Environment, Overrides};
use crate::menu::{Severity, validate_definitions};
use crate::routing::{Account, PermissionAccessManager, Request, RouteProvider};

/// Validate the discovered local task definitions.
#[derive(Args, Debug, Clone)]
pub struct ValidateCommand {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Validation outcome, used for JSON output.
#[derive(Debug, Serialize)]
pub struct ValidationResults {
    /// No errors, and no warnings in strict mode
    pub valid: bool,
    /// Number of definitions that loaded
    pub definitions: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidateCommand {
    pub async fn execute(self, overrides: &Overrides, quiet: bool) -> Result<()> {
        let env = Environment::load(overrides).await?;
        let access = Arc::new(PermissionAccessManager::new(env.routes.clone(), Account::default()));
        let mut manager = env.manager(access, Request::default());

        let definitions = manager.get_definitions().clone();
        let routes: Option<&dyn RouteProvider> = env.has_routes.then_some(env.routes.as_ref() as &dyn RouteProvider);
        let report = validate_definitions(&definitions, manager.rejected(), routes);

        let results = ValidationResults {
            valid: !report.is_failure(self.strict),
            definitions: definitions.len(),
            errors: report.with_severity(Severity::Error).map(ToString::to_string).collect(),
            warnings: report.with_severity(Severity::Warning).map(ToString::to_string).collect(),
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text if !quiet => print_results(&results),
            OutputFormat::Text => {}
        }

        if !results.errors.is_empty() {
            return Err(anyhow!("Validation failed with {} error(s)", results.errors.len()));
        }
        if self.strict && !results.warnings.is_empty() {
            return Err(anyhow!("Strict mode validation failed"));
        }
        Ok(())
    }
}

fn print_results(results: &ValidationResults) {
    for error in &results.errors {
        println!("{} {error}", "✗".red());
    }
    for warning in &results.warnings {
        println!("{} Warning: {warning}", "⚠".yellow());
    }
    if results.errors.is_empty() {
        println!("{} {} local task definitions loaded", "✓".green(), results.definitions);
    }
}
