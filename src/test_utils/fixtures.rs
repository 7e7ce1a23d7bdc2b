//! Test fixtures for definitions and module directories

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A module directory with a `<module>.local_tasks.yml` file.
#[derive(Clone, Debug)]
pub struct ModuleFixture {
    pub name: String,
    pub local_tasks: String,
}

impl ModuleFixture {
    /// Node tabs: View, Edit, Revisions and a Delete tab.
    pub fn node() -> Self {
        Self {
            name: "node".to_string(),
            local_tasks: r#"
node.view:
  route_name: entity.node.canonical
  title: View
  tab_root_id: node.view
node.edit:
  route_name: entity.node.edit_form
  title: Edit
  tab_root_id: node.view
node.delete:
  route_name: entity.node.delete_form
  title: Delete
  tab_root_id: node.view
  weight: 10
node.revisions:
  route_name: entity.node.version_history
  title: Revisions
  tab_root_id: node.view
  weight: 20
"#
            .trim_start()
            .to_string(),
        }
    }

    /// User tabs with a secondary level under Edit.
    pub fn user() -> Self {
        Self {
            name: "user".to_string(),
            local_tasks: r#"
user.page:
  route_name: user.page
  title: Account
  tab_root_id: user.page
user.edit:
  route_name: entity.user.edit_form
  title: Edit
  tab_root_id: user.page
user.edit.account:
  route_name: entity.user.edit_form
  title: Account settings
  tab_root_id: user.page
  tab_parent_id: user.edit
user.edit.profile:
  route_name: user.profile_form
  title: Profile
  tab_root_id: user.page
  tab_parent_id: user.edit
"#
            .trim_start()
            .to_string(),
        }
    }

    /// A module whose only definition lacks a route.
    pub fn broken() -> Self {
        Self {
            name: "broken".to_string(),
            local_tasks: "broken.tab:\n  title: No route\n  tab_root_id: broken.tab\n".to_string(),
        }
    }

    /// Write `<dir>/<name>/<name>.local_tasks.yml` and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let module_dir = dir.join(&self.name);
        fs::create_dir_all(&module_dir)
            .with_context(|| format!("Failed to create {}", module_dir.display()))?;
        let path = module_dir.join(format!("{}.local_tasks.yml", self.name));
        fs::write(&path, &self.local_tasks).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Route YAML matching the node and user fixtures.
pub const ROUTES_YAML: &str = r#"
entity.node.canonical:
  path: /node/{node}
  requirements:
    _permission: access content
entity.node.edit_form:
  path: /node/{node}/edit
  requirements:
    _permission: edit any content
entity.node.delete_form:
  path: /node/{node}/delete
  requirements:
    _permission: delete any content
entity.node.version_history:
  path: /node/{node}/revisions
  requirements:
    _permission: view revisions
user.page:
  path: /user
  requirements:
    _access: "TRUE"
entity.user.edit_form:
  path: /user/{user}/edit
  requirements:
    _access: "TRUE"
user.profile_form:
  path: /user/{user}/profile
  requirements:
    _access: "TRUE"
"#;

/// In-memory definition sets.
pub mod definitions {
    use crate::menu::{DefinitionSet, LocalTaskDefinition};

    /// `A` on `r1` with child `B` on `r2`.
    pub fn scenario_root_and_child() -> DefinitionSet {
        vec![
            LocalTaskDefinition::new("A", "r1", "A").with_title("A"),
            LocalTaskDefinition::new("B", "r2", "A").with_parent("A").with_title("B"),
        ]
        .into()
    }

    /// A single root `C` on `r3`.
    pub fn scenario_single_root() -> DefinitionSet {
        vec![LocalTaskDefinition::new("C", "r3", "C").with_title("C")].into()
    }

    /// Root with two child-bearing siblings `a` and `b`, both with a child
    /// on route `deep`.
    pub fn scenario_two_branches() -> DefinitionSet {
        vec![
            LocalTaskDefinition::new("root", "top", "root"),
            LocalTaskDefinition::new("a", "deep", "root"),
            LocalTaskDefinition::new("a.child", "deep", "root").with_parent("a"),
            LocalTaskDefinition::new("b", "side", "root"),
            LocalTaskDefinition::new("b.child", "deep", "root").with_parent("b"),
        ]
        .into()
    }
}
