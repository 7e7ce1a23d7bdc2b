//! Shared helpers for the CLI tests.

use anyhow::Result;
use assert_cmd::Command;
use cmscore::test_utils::{ModuleFixture, ROUTES_YAML};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary site with module directories and a routes file.
pub struct TestSite {
    _temp_dir: TempDir,
    root: PathBuf,
    modules_dir: PathBuf,
    routes_file: PathBuf,
}

impl TestSite {
    /// An empty site; the routes file holds the fixture routes.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();
        let modules_dir = root.join("modules");
        fs::create_dir_all(&modules_dir)?;
        let routes_file = root.join("routing.yml");
        fs::write(&routes_file, ROUTES_YAML)?;

        Ok(Self {
            _temp_dir: temp_dir,
            root,
            modules_dir,
            routes_file,
        })
    }

    /// A site with the node and user modules.
    pub fn standard() -> Result<Self> {
        let site = Self::new()?;
        site.add_module(&ModuleFixture::node())?;
        site.add_module(&ModuleFixture::user())?;
        Ok(site)
    }

    pub fn add_module(&self, fixture: &ModuleFixture) -> Result<PathBuf> {
        fixture.write_to(&self.modules_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// `cmscore` with no user settings file and no colors.
    pub fn bare_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cmscore").unwrap();
        cmd.current_dir(&self.root)
            .env("CMSCORE_CONFIG", self.root.join("missing-config.toml"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `cmscore --modules <site modules> --routes <site routes>`.
    pub fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        cmd.arg("--modules").arg(&self.modules_dir).arg("--routes").arg(&self.routes_file);
        cmd
    }
}
