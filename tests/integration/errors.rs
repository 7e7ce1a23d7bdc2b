use predicates::prelude::*;
use std::fs;

use crate::common::TestSite;

#[test]
fn test_no_module_directories() {
    let site = TestSite::new().unwrap();

    site.bare_command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no module directories configured"));
}

#[test]
fn test_missing_module_directory_fails_validation() {
    let site = TestSite::new().unwrap();

    site.bare_command()
        .arg("--modules")
        .arg(site.root().join("does-not-exist"))
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("not a directory"));
}

#[test]
fn test_missing_routes_file() {
    let site = TestSite::standard().unwrap();

    site.bare_command()
        .arg("--modules")
        .arg(site.modules_dir())
        .arg("--routes")
        .arg(site.root().join("nope.yml"))
        .args(["tasks", "--route", "user.page"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read routes file"));
}

#[test]
fn test_settings_file_supplies_modules() {
    let site = TestSite::standard().unwrap();
    let config = site.root().join("cmscore.toml");
    fs::write(&config, "module_dirs = [\"modules\"]\nroutes_file = \"routing.yml\"\n").unwrap();

    site.bare_command()
        .arg("--config")
        .arg(&config)
        .args(["tasks", "--route", "user.page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[*] Account (user.page)"));
}

#[test]
fn test_unknown_subcommand() {
    let site = TestSite::new().unwrap();

    site.bare_command().arg("install").assert().failure().stderr(predicate::str::contains("unrecognized subcommand"));
}
