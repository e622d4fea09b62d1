//! Integration tests for the bomvault CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to get a bomvault command
fn bomvault() -> Command {
    Command::cargo_bin("bomvault").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    bomvault()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    bomvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("asset hierarchy"));
}

#[test]
fn test_version_displays() {
    bomvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bomvault"));
}

#[test]
fn test_unknown_command_fails() {
    bomvault()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    bomvault()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".bomvault").is_dir());
    assert!(tmp.path().join(".bomvault/config.yaml").is_file());
    assert!(tmp.path().join(".bomvault/store.db").is_file());
    assert!(tmp.path().join(".bomvault/blobs").is_dir());
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ============================================================================
// Tree Command Tests
// ============================================================================

#[test]
fn test_tree_empty_project_shows_empty_state() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("No assets yet"));
}

#[test]
fn test_tree_outside_project_fails() {
    let tmp = TempDir::new().unwrap();

    bomvault()
        .current_dir(tmp.path())
        .arg("tree")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a bomvault project"));
}

// ============================================================================
// Upload Command Tests
// ============================================================================

#[test]
fn test_upload_missing_file_reports_aggregate_failure() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .args(["upload", "does-not-exist.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("upload failed"));
}

#[test]
fn test_upload_batch_counts_every_failed_file() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .args(["upload", "a.xlsx", "b.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 of 2"));
}

#[test]
fn test_upload_empty_directory_finds_nothing() {
    let tmp = setup_test_project();
    std::fs::create_dir(tmp.path().join("empty")).unwrap();

    bomvault()
        .current_dir(tmp.path())
        .args(["upload", "empty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No workbook files found"));
}

// ============================================================================
// Show / Bom / Rm Error Path Tests
// ============================================================================

#[test]
fn test_show_unknown_node_fails() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .args(["show", "Plant/missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_bom_list_unknown_asset_fails() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .args(["bom", "list", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_rm_unknown_node_fails() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .args(["rm", "--yes", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Status Command Tests
// ============================================================================

#[test]
fn test_status_empty_project() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("BOM Vault Status"));
}

#[test]
fn test_status_json_format() {
    let tmp = setup_test_project();

    bomvault()
        .current_dir(tmp.path())
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_nodes\": 0"));
}

// ============================================================================
// Completions Command Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    bomvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bomvault"));
}
