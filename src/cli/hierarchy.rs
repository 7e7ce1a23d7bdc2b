//! Print the cached hierarchy entry of a route.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use super::common::{Environment, Overrides};
use crate::routing::{Account, PermissionAccessManager, Request};

/// Show which tab groups, path tabs and children a route resolves to.
#[derive(Args, Debug, Clone)]
pub struct HierarchyCommand {
    /// Route to build the hierarchy of
    #[arg(long)]
    pub route: String,
}

impl HierarchyCommand {
    pub async fn execute(self, overrides: &Overrides) -> Result<()> {
        let env = Environment::load(overrides).await?;
        let access = Arc::new(PermissionAccessManager::new(env.routes.clone(), Account::default()));
        let mut manager = env.manager(access, Request::for_route(self.route.clone()));

        let entry = manager.hierarchy_for_route(&self.route);
        println!("{}", serde_json::to_string_pretty(&entry)?);
        Ok(())
    }
}
