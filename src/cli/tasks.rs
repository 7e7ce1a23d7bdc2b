//! Print the rendered tabs of a route.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::sync::Arc;

use super::OutputFormat;
use super::common::{Environment, Overrides, into_map, parse_key_value};
use crate::menu::TaskBuild;
use crate::routing::{Account, PermissionAccessManager, Request};

/// Render the local tasks of a route for a user.
#[derive(Args, Debug, Clone)]
pub struct TasksCommand {
    /// Route to render the tabs of
    #[arg(long)]
    pub route: String,

    /// Request attribute, e.g. `--attr node=7` (repeatable)
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub attributes: Vec<(String, String)>,

    /// Permission held by the user (repeatable)
    #[arg(long = "permission", value_name = "PERMISSION")]
    pub permissions: Vec<String>,

    /// Account id of the user
    #[arg(long, default_value_t = 1)]
    pub uid: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl TasksCommand {
    pub async fn execute(self, overrides: &Overrides) -> Result<()> {
        let env = Environment::load(overrides).await?;

        let attributes = into_map(&self.attributes);
        let request = Request {
            route_name: Some(self.route.clone()),
            attributes,
            raw_variables: None,
        };
        let account = Account::with_permissions(self.uid, self.permissions.iter().cloned());
        let access = Arc::new(PermissionAccessManager::new(env.routes.clone(), account));

        let mut manager = env.manager(access, request);
        let build = manager.get_tasks_build(&self.route);
        tracing::debug!("Rendered {} tab(s) for '{}'", build.len(), self.route);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&build)?),
            OutputFormat::Text => print_build(&self.route, &build),
        }
        Ok(())
    }
}

fn print_build(route: &str, build: &TaskBuild) {
    if build.is_empty() {
        println!("No local tasks for route {}", route.bold());
        return;
    }

    for (depth, links) in build.levels() {
        println!("{}", format!("Level {depth}").bold());
        for link in links {
            let marker = if link.active {
                "*".green().to_string()
            } else {
                " ".to_string()
            };
            println!(
                "  [{marker}] {} {} {}",
                link.title,
                format!("({})", link.plugin_id).dimmed(),
                format!("→ {} weight {}", link.route_name, link.weight).dimmed()
            );
        }
    }
}
