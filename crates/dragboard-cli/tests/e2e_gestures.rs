//! E2E CLI tests covering:
//! - `dragboard show` in JSON and text modes
//! - `dragboard check` verdicts for the list-pair ban and parity clash
//! - `dragboard move` single, group, and abandoned gestures
//! - `dragboard replay` of JSON-lines scripts, including malformed ones
//!
//! Each test runs the `dragboard` binary as a subprocess in an isolated temp
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the dragboard binary, rooted in `dir`.
fn db_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dragboard"));
    cmd.current_dir(dir);
    cmd.env("DRAGBOARD_LOG", "error");
    cmd.env_remove("DRAGBOARD_CONFIG");
    cmd.env_remove("FORMAT");
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd
}

/// Run with `--json` and parse stdout, asserting success.
fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = db_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

fn list_ids(snapshot: &Value, list: usize) -> Vec<String> {
    snapshot["lists"][list]["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_str().expect("id").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_json_has_seeded_board() {
    let dir = TempDir::new().expect("tempdir");
    let board = run_json(dir.path(), &["show"]);

    assert_eq!(board["lists"].as_array().map(Vec::len), Some(4));
    assert_eq!(board["lists"][0]["id"], "list-1");
    assert_eq!(board["lists"][0]["title"], "Column 1");
    assert_eq!(
        list_ids(&board, 0),
        ["item-0", "item-1", "item-2", "item-3", "item-4"]
    );
    assert_eq!(list_ids(&board, 1).len(), 5);
    assert!(list_ids(&board, 2).is_empty());
    assert!(list_ids(&board, 3).is_empty());
    assert_eq!(board["dragging"], false);
}

#[test]
fn show_text_filters_one_list() {
    let dir = TempDir::new().expect("tempdir");
    db_cmd(dir.path())
        .args(["show", "--list", "column-2", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list id=list-2 items=5"))
        .stdout(predicate::str::contains("list id=list-1").not());
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_rejects_first_to_third() {
    let dir = TempDir::new().expect("tempdir");
    let verdict = run_json(dir.path(), &["check", "--from", "list-1:1", "--to", "list-3:0"]);

    assert_eq!(verdict["item"], "item-1");
    assert_eq!(verdict["allowed"], false);
    assert_eq!(verdict["rejection"]["rule"], "list-pair-ban");
    assert_eq!(verdict["invalid_item_id"], "item-1");
}

#[test]
fn check_allows_second_to_third() {
    let dir = TempDir::new().expect("tempdir");
    let verdict = run_json(dir.path(), &["check", "--from", "list-2:0", "--to", "list-3:0"]);

    assert_eq!(verdict["allowed"], true);
    assert!(verdict["rejection"].is_null());
}

#[test]
fn check_flags_even_on_even_only_inside_the_list() {
    let dir = TempDir::new().expect("tempdir");

    // item-0 over item-6
    let clash = run_json(dir.path(), &["check", "--from", "list-1:0", "--to", "list-2:1"]);
    assert_eq!(clash["allowed"], false);
    assert_eq!(clash["rejection"]["rule"], "parity-clash");
    assert_eq!(clash["invalid_item_id"], "item-0");
    assert_eq!(clash["rejection"]["occupant"], "item-6");

    // appending past the end has no occupant
    let append = run_json(dir.path(), &["check", "--from", "list-1:0", "--to", "list-2:5"]);
    assert_eq!(append["allowed"], true);
}

#[test]
fn check_text_prints_reason() {
    let dir = TempDir::new().expect("tempdir");
    db_cmd(dir.path())
        .args(["check", "--from", "1:0", "--to", "3:0", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed=false"))
        .stdout(predicate::str::contains(
            "moves from list-1 to list-3 are not allowed",
        ));
}

// ---------------------------------------------------------------------------
// move
// ---------------------------------------------------------------------------

#[test]
fn move_commits_to_empty_list() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(dir.path(), &["move", "--from", "list-1:2", "--to", "list-4:0"]);

    assert_eq!(report["outcome"]["status"], "committed");
    assert_eq!(report["outcome"]["commit"]["kind"], "moved");
    assert_eq!(list_ids(&report["snapshot"], 3), ["item-2"]);
    assert_eq!(
        list_ids(&report["snapshot"], 0),
        ["item-0", "item-1", "item-3", "item-4"]
    );
}

#[test]
fn move_within_a_list_reorders() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(dir.path(), &["move", "--from", "list-1:0", "--to", "list-1:3"]);

    assert_eq!(report["outcome"]["commit"]["kind"], "reordered");
    assert_eq!(
        list_ids(&report["snapshot"], 0),
        ["item-1", "item-2", "item-3", "item-0", "item-4"]
    );
}

#[test]
fn group_move_lands_as_one_block_and_clears_selection() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(
        dir.path(),
        &[
            "move", "--select", "item-3", "--select", "item-7", "--from", "list-1:1", "--to",
            "list-4:0",
        ],
    );

    assert_eq!(report["outcome"]["commit"]["kind"], "group-moved");
    assert_eq!(list_ids(&report["snapshot"], 3), ["item-3", "item-7"]);
    assert_eq!(
        list_ids(&report["snapshot"], 0),
        ["item-0", "item-1", "item-2", "item-4"]
    );
    assert_eq!(
        list_ids(&report["snapshot"], 1),
        ["item-5", "item-6", "item-8", "item-9"]
    );
    assert_eq!(report["snapshot"]["selection"], serde_json::json!([]));
}

#[test]
fn rejected_move_leaves_board_alone() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(dir.path(), &["move", "--from", "list-1:0", "--to", "list-3:0"]);

    assert_eq!(report["outcome"]["status"], "aborted");
    assert_eq!(report["outcome"]["abort"]["reason"], "rejected");
    assert_eq!(list_ids(&report["snapshot"], 0).len(), 5);
    assert!(list_ids(&report["snapshot"], 2).is_empty());
}

#[test]
fn release_outside_every_list_aborts() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(
        dir.path(),
        &["move", "--from", "list-2:0", "--via", "list-4:0"],
    );

    assert_eq!(report["outcome"]["abort"]["reason"], "no-destination");
    assert_eq!(report["snapshot"]["dragging"], false);
    assert!(report["snapshot"]["highlighted"].is_null());
}

#[test]
fn move_from_empty_slot_is_a_coded_error() {
    let dir = TempDir::new().expect("tempdir");
    let output = db_cmd(dir.path())
        .args(["move", "--from", "list-3:0", "--to", "list-4:0", "--json"])
        .output()
        .expect("command should not crash");

    assert!(!output.status.success());
    let err: Value = serde_json::from_slice(&output.stderr).expect("JSON error");
    assert_eq!(err["error"]["error_code"], "E2001");
}

#[test]
fn selecting_unknown_item_fails() {
    let dir = TempDir::new().expect("tempdir");
    db_cmd(dir.path())
        .args(["move", "--select", "item-99", "--from", "list-1:0", "--to", "list-4:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("item-99"));
}

// ---------------------------------------------------------------------------
// replay
// ---------------------------------------------------------------------------

const SCRIPT: &str = r#"# select two, drag a third, drop on list-4
{"type":"toggle-selection","item_id":"item-3"}
{"type":"toggle-selection","item_id":"item-7"}
{"type":"drag-start","source":{"list":"list-1","index":1,"item_id":"item-1"}}
{"type":"drag-update","source":{"list":"list-1","index":1},"destination":{"list":"list-3","index":0}}

{"type":"drag-update","source":{"list":"list-1","index":1},"destination":{"list":"list-4","index":0}}
{"type":"drop","source":{"list":"list-1","index":1},"destination":{"list":"list-4","index":0}}
{"type":"toggle-selection","item_id":"item-42"}
"#;

#[test]
fn replay_script_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("session.jsonl");
    fs::write(&path, SCRIPT).expect("write script");

    let out = run_json(dir.path(), &["replay", "session.jsonl"]);
    assert_eq!(out["events"], 7);
    assert_eq!(out["commits"], 1);

    let steps = out["steps"].as_array().expect("steps");
    assert_eq!(steps[3]["signal"]["signal"], "highlight");
    assert_eq!(steps[3]["signal"]["invalid_item_id"], "item-1");
    assert!(steps[4]["signal"]["invalid_item_id"].is_null());
    assert_eq!(steps[5]["signal"]["signal"], "settled");
    assert_eq!(steps[6]["signal"]["signal"], "ignored");
    assert_eq!(steps[6]["signal"]["code"], "E2003");

    assert_eq!(list_ids(&out["board"], 3), ["item-3", "item-7"]);
}

#[test]
fn replay_from_stdin_summary() {
    let dir = TempDir::new().expect("tempdir");
    let output = db_cmd(dir.path())
        .args(["replay", "-", "--summary", "--json"])
        .write_stdin(SCRIPT)
        .output()
        .expect("command should not crash");
    assert!(output.status.success());

    let out: Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert!(out.get("steps").is_none());
    assert_eq!(out["commits"], 1);
}

#[test]
fn malformed_script_reports_line_and_code() {
    let dir = TempDir::new().expect("tempdir");
    let output = db_cmd(dir.path())
        .args(["replay", "-", "--json"])
        .write_stdin("{\"type\":\"toggle-selection\",\"item_id\":\"item-1\"}\n{\"type\":\"fling\"}\n")
        .output()
        .expect("command should not crash");

    assert!(!output.status.success());
    let err: Value = serde_json::from_slice(&output.stderr).expect("JSON error");
    assert_eq!(err["error"]["error_code"], "E3002");
    let message = err["error"]["message"].as_str().expect("message");
    assert!(message.contains("line 2"), "{message}");
}

#[test]
fn missing_script_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    db_cmd(dir.path())
        .args(["replay", "nope.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.jsonl"));
}
