use predicates::prelude::*;
use serde_json::Value;

use crate::common::TestSite;

fn json_output(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_tasks_text_output() {
    let site = TestSite::standard().unwrap();

    site.command()
        .args(["tasks", "--route", "entity.node.edit_form", "--attr", "node=7"])
        .args(["--permission", "access content", "--permission", "edit any content"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 0"))
        .stdout(predicate::str::contains("[*] Edit (node.edit)"))
        .stdout(predicate::str::contains("[ ] View (node.view)"))
        .stdout(predicate::str::contains("Delete").not());
}

#[test]
fn test_tasks_json_output() {
    let site = TestSite::standard().unwrap();

    let output = site
        .command()
        .args(["tasks", "--route", "entity.user.edit_form", "--attr", "user=3", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let build = json_output(&output);
    let primary = build["0"].as_array().unwrap();
    let secondary = build["1"].as_array().unwrap();
    assert_eq!(primary.len(), 2);
    assert_eq!(secondary.len(), 2);
    assert_eq!(secondary[0]["plugin_id"], "user.edit.account");
    assert_eq!(secondary[0]["active"], true);
    assert_eq!(secondary[0]["route_parameters"]["user"], "3");
    assert_eq!(primary[0]["plugin_id"], "user.page");
    assert_eq!(primary[0]["weight"], -10);
}

#[test]
fn test_tasks_without_permissions_is_empty() {
    let site = TestSite::standard().unwrap();

    site.command()
        .args(["tasks", "--route", "entity.node.canonical", "--attr", "node=7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No local tasks for route entity.node.canonical"));
}

#[test]
fn test_tasks_for_route_without_tabs_json() {
    let site = TestSite::standard().unwrap();

    let output = site.command().args(["tasks", "--route", "system.admin", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(json_output(&output), serde_json::json!({}));
}
