//! End-to-end tests driving the `cram` binary.
//!
//! Tests the full pipeline: add → timeline → toggle → export → import

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn cram_binary() -> String {
    env!("CARGO_BIN_EXE_cram").to_string()
}

/// Runs `cram` against the given database with an isolated home directory.
fn cram(home: &Path, db: &Path, args: &[&str]) -> Output {
    Command::new(cram_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("CRAM_DATABASE_PATH", db)
        .env_remove("CRAM_DEFAULT_TYPE")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run cram")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "cram should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn db_path(temp: &TempDir, name: &str) -> PathBuf {
    temp.path().join("data").join(name)
}

#[test]
#[expect(clippy::float_cmp, reason = "segment hours are whole numbers")]
fn test_overnight_activity_flow() {
    let temp = TempDir::new().unwrap();
    let db = db_path(&temp, "planner.db");

    let added = stdout_of(&cram(
        temp.path(),
        &db,
        &[
            "add",
            "Overnight shift",
            "--type",
            "work",
            "--start",
            "2024-01-01T22:00",
            "--end",
            "2024-01-02T02:00",
        ],
    ));
    assert!(added.starts_with("Added "), "unexpected output: {added}");
    assert!(added.contains("Overnight shift (work, 4.0h)"));

    // The activity crosses midnight, so it lands on both days.
    let timeline = stdout_of(&cram(
        temp.path(),
        &db,
        &[
            "timeline",
            "--start",
            "2024-01-01T00:00",
            "--end",
            "2024-01-03T00:00",
            "--json",
        ],
    ));
    let timeline: serde_json::Value = serde_json::from_str(&timeline).unwrap();
    let days = timeline["days"].as_object().unwrap();
    assert_eq!(days.len(), 2);
    for day in ["2024-01-01", "2024-01-02"] {
        let segments = days[day].as_array().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0]["duration_hours"].as_f64().unwrap(), 2.0);
        assert_eq!(segments[0]["name"], "Overnight shift");
    }

    let exported = stdout_of(&cram(temp.path(), &db, &["export"]));
    let exported: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let id = exported[0]["id"].as_str().unwrap().to_string();

    let toggled = stdout_of(&cram(temp.path(), &db, &["toggle", &id[..6]]));
    assert!(toggled.ends_with("as done\n"), "unexpected output: {toggled}");

    let listed = stdout_of(&cram(temp.path(), &db, &["list"]));
    assert!(listed.contains("[x] Overnight shift"));
}

#[test]
fn test_export_import_between_databases() {
    let temp = TempDir::new().unwrap();
    let source = db_path(&temp, "source.db");
    let target = db_path(&temp, "target.db");

    for (name, kind, start, end) in [
        ("Essay", "school", "2024-01-01T09:00", "2024-01-01T11:00"),
        ("Climbing", "hobbies", "2024-01-01T18:00", "2024-01-01T20:00"),
    ] {
        stdout_of(&cram(
            temp.path(),
            &source,
            &["add", name, "--type", kind, "--start", start, "--end", end],
        ));
    }

    let exported = stdout_of(&cram(temp.path(), &source, &["export"]));
    let dump = temp.path().join("dump.json");
    std::fs::write(&dump, &exported).unwrap();

    let imported = stdout_of(&cram(
        temp.path(),
        &target,
        &["import", dump.to_str().unwrap()],
    ));
    assert_eq!(imported, "Imported 2 activities\n");

    let listed = stdout_of(&cram(temp.path(), &target, &["list", "--json"]));
    let source_json: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let target_json: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(source_json, target_json);
}

#[test]
fn test_add_rejects_reversed_span() {
    let temp = TempDir::new().unwrap();
    let db = db_path(&temp, "planner.db");

    let output = cram(
        temp.path(),
        &db,
        &[
            "add",
            "Backwards",
            "--start",
            "2024-01-01T10:00",
            "--end",
            "2024-01-01T09:00",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("before start"));
}

#[test]
fn test_report_json_is_valid() {
    let temp = TempDir::new().unwrap();
    let db = db_path(&temp, "planner.db");

    let report = stdout_of(&cram(
        temp.path(),
        &db,
        &["report", "--period", "month", "--last", "--json"],
    ));
    let report: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(report["period"], "last_month");
    assert_eq!(report["summary"]["activity_count"], 0);
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let db = db_path(&temp, "planner.db");

    let help = stdout_of(&cram(temp.path(), &db, &[]));
    assert!(help.contains("Usage: cram"));
}
