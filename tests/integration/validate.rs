use cmscore::test_utils::ModuleFixture;
use predicates::prelude::*;
use serde_json::Value;

use crate::common::TestSite;

#[test]
fn test_validate_valid_site() {
    let site = TestSite::standard().unwrap();

    site.command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ 8 local task definitions loaded"));
}

#[test]
fn test_validate_broken_module_fails() {
    let site = TestSite::standard().unwrap();
    site.add_module(&ModuleFixture::broken()).unwrap();

    site.command()
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗"))
        .stdout(predicate::str::contains("broken.tab"))
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_validate_json_report() {
    let site = TestSite::standard().unwrap();
    site.add_module(&ModuleFixture::broken()).unwrap();

    let output = site.command().args(["validate", "--format", "json"]).output().unwrap();
    assert!(!output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["definitions"], 8);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);
}

#[test]
fn test_warnings_only_fail_in_strict_mode() {
    let site = TestSite::standard().unwrap();
    site.add_module(&ModuleFixture {
        name: "forum".to_string(),
        local_tasks: "forum.overview:\n  route_name: forum.overview\n  title: Forums\n  tab_root_id: forum.overviw\n"
            .to_string(),
    })
    .unwrap();

    site.command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("⚠ Warning:"))
        .stdout(predicate::str::contains("did you mean 'forum.overview'?"))
        .stdout(predicate::str::contains("unknown route 'forum.overview'"));

    site.command()
        .args(["validate", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Strict mode validation failed"));
}

#[test]
fn test_quiet_validate_prints_nothing() {
    let site = TestSite::standard().unwrap();

    site.command().args(["--quiet", "validate"]).assert().success().stdout(predicate::str::is_empty());
}
