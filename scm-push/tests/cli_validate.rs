use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn validate_passes_for_real_fixture() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("scm-push"));
    cmd.arg("validate")
        .arg(fixture("fixtures/source.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("validation: valid"));
}

#[test]
fn validate_fails_on_dangling_reference() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("broken.json");
    fs::write(
        &input,
        r#"{"folders": [{"name": "Shared", "address_groups": [{"name": "g1", "static": ["ghost"]}]}]}"#,
    )
    .expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("scm-push"));
    cmd.arg("validate")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"))
        .stdout(predicate::str::contains("g1: ghost"));
}

#[test]
fn validate_accepts_cycles_unless_strict() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("cyclic.json");
    fs::write(
        &input,
        r#"{"folders": [{"name": "Shared", "address_groups": [
            {"name": "a", "static": ["b"]},
            {"name": "b", "static": ["a"]}
        ]}]}"#,
    )
    .expect("write");

    Command::new(assert_cmd::cargo::cargo_bin!("scm-push"))
        .arg("validate")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("cycles detected"));

    Command::new(assert_cmd::cargo::cargo_bin!("scm-push"))
        .arg("validate")
        .arg(&input)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle detected"));
}

#[test]
fn validate_rejects_non_object_snapshot() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("list.json");
    fs::write(&input, "[]").expect("write");

    Command::new(assert_cmd::cargo::cargo_bin!("scm-push"))
        .arg("validate")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}
