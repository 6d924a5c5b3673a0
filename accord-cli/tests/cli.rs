//! End-to-end tests of the accord binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_doc(dir: &Path, name: &str, tiers: &[(&str, &[(&str, u64, u64)])]) -> String {
    let tiers: Vec<serde_json::Value> = tiers
        .iter()
        .map(|(tier, segs)| {
            let segments: Vec<serde_json::Value> = segs
                .iter()
                .map(|(l, b, e)| serde_json::json!({"label": l, "begin": b, "end": e}))
                .collect();
            serde_json::json!({"name": tier, "annotator": "", "segments": segments})
        })
        .collect();
    let path = dir.join(name);
    let doc = serde_json::json!({"path": name, "tiers": tiers});
    fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

fn session(dir: &Path) -> String {
    write_doc(
        dir,
        "session.json",
        &[
            ("R1", &[("x", 0, 1000), ("y", 2000, 3000)]),
            ("R2", &[("x", 0, 1000), ("x", 2000, 3000)]),
            ("R3", &[("x", 0, 1000), ("y", 2000, 3000)]),
        ],
    )
}

fn accord() -> Command {
    Command::cargo_bin("accord").unwrap()
}

#[test]
fn test_compare_current_document_text() {
    let dir = TempDir::new().unwrap();
    let current = session(dir.path());
    accord()
        .args(["compare", "-q", "--current", &current, "--first", "R1", "--second", "R2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Output created: "))
        .stdout(predicate::str::contains("Number of files involved: 1 (current transcription)"))
        .stdout(predicate::str::contains("Required minimal overlap percentage: 60%"))
        .stdout(predicate::str::contains("End of global results."));
}

#[test]
fn test_compare_json_output() {
    let dir = TempDir::new().unwrap();
    let current = session(dir.path());
    let out = accord()
        .args([
            "compare", "-q", "--current", &current, "--first", "R1", "--second", "R3", "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["results"]["kind"], "pairwise");
    let kappa = json["results"]["aggregate"]["global"]["overall"]["including"]["kappa"]
        .as_f64()
        .unwrap();
    assert!((kappa - 1.0).abs() < 1e-9);
}

#[test]
fn test_compare_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let current = session(dir.path());
    let report = dir.path().join("report.txt");
    accord()
        .args(["compare", "-q", "--current", &current, "--first", "R1", "--second", "R2", "-o"])
        .arg(&report)
        .assert()
        .success();
    let text = fs::read_to_string(report).unwrap();
    assert!(text.contains("Global per value agreement table:"));
}

#[test]
fn test_missing_second_tier_fails() {
    let dir = TempDir::new().unwrap();
    let current = session(dir.path());
    accord()
        .args(["compare", "-q", "--current", &current, "--first", "R1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"));
}

#[test]
fn test_invalid_overlap_rejected_by_parser() {
    accord()
        .args(["compare", "--overlap", "0.3"])
        .assert()
        .failure();
}

#[test]
fn test_group_wise_report_and_export() {
    let dir = TempDir::new().unwrap();
    let current = session(dir.path());
    let export = dir.path().join("groups");
    accord()
        .args([
            "compare", "-q", "--current", &current, "--group-wise", "-t", "R1", "-t", "R2", "-t", "R3", "--tables",
            "--export-groups",
        ])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Calculating Fleiss' kappa per group of matching tiers."))
        .stdout(predicate::str::contains("Comparison cluster: 0"))
        .stdout(predicate::str::contains("Kappa including \"Unmatched\" value: k = "));
    assert!(export.join("R1").join("session.json").exists());
}

#[test]
fn test_plan_lists_prefix_pairs() {
    let dir = TempDir::new().unwrap();
    let file = write_doc(
        dir.path(),
        "a.json",
        &[
            ("gesture_R1", &[("x", 0, 10)]),
            ("gesture_R2", &[("x", 0, 10)]),
            ("gaze_R1", &[("x", 0, 10)]),
        ],
    );
    accord()
        .args([
            "plan",
            "--file",
            &file,
            "--tier-matching",
            "prefix",
            "--tier-separators",
            "_",
            "-t",
            "gesture_R1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("gesture_R1 (a.json) <> gesture_R2 (a.json)"))
        .stdout(predicate::str::contains("gaze").not());
}

#[test]
fn test_completions() {
    accord()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("accord"));
}

#[test]
fn test_partial_assignment_warning_printed_once() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(dir.path(), "s1_A.json", &[("r1", &[("x", 0, 10)]), ("r2", &[("x", 0, 10)])]);
    let b = write_doc(dir.path(), "s1_B.json", &[("r3", &[("x", 0, 10)])]);
    let out = accord()
        .args([
            "compare", "--scope", "across-files", "--file-matching", "prefix", "--file-separators", "_",
            "--group-wise", "-t", "r1", "-t", "r2", "-t", "r3", "--file", &a, "--file", &b,
        ])
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    let message = "2 matching files for 3 tier names, only 2 tiers could be assigned to a file";
    assert_eq!(stderr.matches(message).count(), 1, "stderr: {stderr}");
}

#[test]
fn test_quiet_suppresses_warnings() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(dir.path(), "s1_A.json", &[("r1", &[("x", 0, 10)]), ("r2", &[("x", 0, 10)])]);
    let b = write_doc(dir.path(), "s1_B.json", &[("r3", &[("x", 0, 10)])]);
    accord()
        .args([
            "compare", "-q", "--scope", "across-files", "--file-matching", "prefix", "--file-separators", "_",
            "--group-wise", "-t", "r1", "-t", "r2", "-t", "r3", "--file", &a, "--file", &b,
        ])
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("could be assigned").not());
}
