// Headless runs of the binary: the empty-input exit path and `--dump`.
#![allow(deprecated)] // assert_cmd::Command::cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn loadline() -> Command {
    let mut cmd = Command::cargo_bin("loadline").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn empty_input_exits_with_status_one_and_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loadTimings.json");
    fs::write(&path, "[]").unwrap();

    loadline()
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn dump_prints_derived_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loadTimings.json");
    fs::write(
        &path,
        r#"[{"Name":"LoadScene","Context":"main","Start":100.0,"End":100.25},
            {"Name":"7","Context":"worker","Start":100.1,"End":100.2,"Asset":"ui.bundle"}]"#,
    )
    .unwrap();

    let output = loadline().arg("--dump").arg(&path).output().unwrap();
    assert!(output.status.success());

    let events: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);

    assert_eq!(events[0]["Name"], "LoadScene");
    assert_eq!(events[0]["Diff"], 0.25);
    assert_eq!(events[0]["Color"], "LoadScene");

    assert_eq!(events[1]["Color"], 1);
    assert!((events[1]["Diff"].as_f64().unwrap() - 0.1).abs() < 1e-9);
    assert_eq!(events[1]["Asset"], "ui.bundle");
    assert!(events[1]["Start"].is_string());
}

#[test]
fn dump_keeps_record_order_and_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");
    let records: Vec<String> = (0..25)
        .map(|i| {
            format!(
                r#"{{"Name":"{}","Context":"ctx{}","Start":{}.0,"End":{}.5}}"#,
                i,
                i % 3,
                1000 + i,
                1000 + i
            )
        })
        .collect();
    fs::write(&path, format!("[{}]", records.join(","))).unwrap();

    let output = loadline().arg("--dump").arg(&path).output().unwrap();
    assert!(output.status.success());

    let events: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 25);
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event["Name"], i.to_string());
        assert_eq!(event["Color"], (i % 2) as u64);
        assert_eq!(event["Diff"], 0.5);
    }
}

#[test]
fn missing_file_fails_with_the_path_in_the_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loadTimings.json");

    loadline()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loadTimings.json"));
}

#[test]
fn malformed_record_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loadTimings.json");
    fs::write(&path, r#"[{"Name":"LoadMods","Start":1.0,"End":2.0}]"#).unwrap();

    loadline()
        .arg("--dump")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Context"));
}
