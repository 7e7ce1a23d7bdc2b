use predicates::prelude::*;
use serde_json::Value;

use crate::common::TestSite;

#[test]
fn test_hierarchy_of_secondary_tab() {
    let site = TestSite::standard().unwrap();

    let output = site.command().args(["hierarchy", "--route", "user.profile_form"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let entry: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entry["tab_root_ids"], serde_json::json!(["user.page"]));
    assert_eq!(entry["parents"], serde_json::json!(["user.edit", "user.edit.profile"]));
    let roots = entry["children"]["> user.page"].as_array().unwrap();
    let ids: Vec<&str> = roots.iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["user.page", "user.edit"]);
    assert_eq!(entry["children"]["user.edit"].as_array().unwrap().len(), 2);
}

#[test]
fn test_hierarchy_of_unknown_route_is_empty() {
    let site = TestSite::standard().unwrap();

    site.command()
        .args(["hierarchy", "--route", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tab_root_ids\": []"));
}

#[test]
fn test_hierarchy_does_not_need_routes() {
    let site = TestSite::standard().unwrap();

    site.bare_command()
        .arg("--modules")
        .arg(site.modules_dir())
        .args(["hierarchy", "--route", "entity.node.canonical"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node.revisions"));
}
