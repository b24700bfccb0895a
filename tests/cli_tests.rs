//! End-to-end tests for the stayontask binary.
//!
//! Every test points `STAYONTASK_HOME` at its own temporary directory, so
//! the task file and socket never touch the real home directory.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn stayontask(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stayontask").unwrap();
    cmd.env("STAYONTASK_HOME", home).env_remove("RUST_LOG");
    cmd
}

/// Reads the ids of the stored tasks in insertion order.
fn stored_ids(home: &Path) -> Vec<String> {
    let raw = std::fs::read_to_string(home.join("todos.json")).unwrap();
    let tasks: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    tasks
        .iter()
        .map(|task| task["id"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// General Tests
// ============================================================================

mod general_tests {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let home = TempDir::new().unwrap();

        stayontask(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("daemon"))
            .stdout(predicate::str::contains("board"));
    }

    #[test]
    fn test_completions_bash() {
        let home = TempDir::new().unwrap();

        stayontask(home.path())
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("stayontask"));
    }

    #[test]
    fn test_switch_rejects_unknown_mode() {
        let home = TempDir::new().unwrap();

        stayontask(home.path())
            .args(["switch", "nap"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("nap"));
    }

    #[test]
    fn test_status_without_daemon_fails() {
        let home = TempDir::new().unwrap();

        stayontask(home.path())
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cannot reach the daemon"));
    }
}

// ============================================================================
// Task Workflow Tests
// ============================================================================

mod task_workflow_tests {
    use super::*;

    #[test]
    fn test_empty_board_shows_hint() {
        let home = TempDir::new().unwrap();

        stayontask(home.path())
            .arg("board")
            .assert()
            .success()
            .stdout(predicate::str::contains("== To do (0) =="))
            .stdout(predicate::str::contains("No tasks yet"));
    }

    #[test]
    fn test_add_then_list() {
        let home = TempDir::new().unwrap();

        stayontask(home.path())
            .args(["task", "add", "Write report", "-p", "high", "--due", "2026-11-02"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Added"));

        stayontask(home.path())
            .args(["task", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[todo] !!! Write report (work) due 2026-11-02"));
    }

    #[test]
    fn test_move_and_board() {
        let home = TempDir::new().unwrap();
        stayontask(home.path())
            .args(["task", "add", "Review PR"])
            .assert()
            .success();
        let id = stored_ids(home.path()).remove(0);

        stayontask(home.path())
            .args(["task", "move", &id[..8], "in-progress"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Task moved to in-progress"));

        stayontask(home.path())
            .arg("board")
            .assert()
            .success()
            .stdout(predicate::str::contains("== In progress (1) =="))
            .stdout(predicate::str::contains("Review PR"));

        stayontask(home.path())
            .args(["task", "list", "--status", "todo"])
            .assert()
            .success()
            .stdout("No tasks\n");
    }

    #[test]
    fn test_move_to_unknown_column_fails() {
        let home = TempDir::new().unwrap();
        stayontask(home.path())
            .args(["task", "add", "Plan"])
            .assert()
            .success();
        let id = stored_ids(home.path()).remove(0);

        stayontask(home.path())
            .args(["task", "move", &id, "archive"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown column 'archive'"));
    }

    #[test]
    fn test_done_then_remove() {
        let home = TempDir::new().unwrap();
        stayontask(home.path())
            .args(["task", "add", "Tidy desk"])
            .assert()
            .success();
        let id = stored_ids(home.path()).remove(0);

        stayontask(home.path())
            .args(["task", "done", &id])
            .assert()
            .success();
        stayontask(home.path())
            .args(["task", "list", "--status", "done"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Tidy desk"));

        stayontask(home.path())
            .args(["task", "remove", &id])
            .assert()
            .success()
            .stdout(predicate::str::contains("Task removed"));
        assert!(stored_ids(home.path()).is_empty());
    }

    #[test]
    fn test_unknown_id_fails() {
        let home = TempDir::new().unwrap();

        stayontask(home.path())
            .args(["task", "done", "ffffffff"])
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("error:"));
    }

    #[test]
    fn test_move_unknown_full_id_fails() {
        let home = TempDir::new().unwrap();
        stayontask(home.path())
            .args(["task", "add", "Plan"])
            .assert()
            .success();

        stayontask(home.path())
            .args(["task", "move", "123e4567-e89b-12d3-a456-426614174000", "done"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No task matches"));

        stayontask(home.path())
            .args(["task", "list", "--status", "done"])
            .assert()
            .success()
            .stdout("No tasks\n");
    }

    #[test]
    fn test_blank_title_rejected() {
        let home = TempDir::new().unwrap();

        stayontask(home.path())
            .args(["task", "add", "   "])
            .assert()
            .failure();
        assert!(!home.path().join("todos.json").exists());
    }
}
