//! CLI smoke tests running the compiled binary against a temp database.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

fn daybook(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("daybook").unwrap();
    cmd.env("DAYBOOK_DB", temp_dir.path().join("journal.db"));
    cmd
}

#[test]
#[serial]
fn test_help_lists_subcommands() {
    let temp_dir = TempDir::new().unwrap();
    daybook(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("streak"));
}

#[test]
#[serial]
fn test_add_show_round_trip() {
    let temp_dir = TempDir::new().unwrap();

    daybook(&temp_dir)
        .args([
            "add",
            "--date",
            "2024-03-14",
            "--title",
            "Pi day",
            "--content",
            "ate pie and wrote code",
            "--mood",
            "Happy",
            "--tag",
            "Hobbies",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved entry"));

    daybook(&temp_dir)
        .args(["show", "--date", "2024-03-14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pi day"))
        .stdout(predicate::str::contains("ate pie and wrote code"))
        .stdout(predicate::str::contains("Happy"));
}

#[test]
#[serial]
fn test_add_twice_updates_instead_of_failing() {
    let temp_dir = TempDir::new().unwrap();

    daybook(&temp_dir)
        .args(["add", "--date", "2024-03-14", "--content", "first draft"])
        .assert()
        .success();

    daybook(&temp_dir)
        .args(["add", "--date", "2024-03-14", "--content", "second draft"])
        .assert()
        .success();

    daybook(&temp_dir)
        .args(["show", "--date", "2024-03-14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("second draft"))
        .stdout(predicate::str::contains("first draft").not());
}

#[test]
#[serial]
fn test_list_filters_by_search_term() {
    let temp_dir = TempDir::new().unwrap();

    daybook(&temp_dir)
        .args(["add", "--date", "2024-03-01", "--content", "coffee with friends"])
        .assert()
        .success();
    daybook(&temp_dir)
        .args(["add", "--date", "2024-03-02", "--content", "quiet evening"])
        .assert()
        .success();

    daybook(&temp_dir)
        .args(["list", "--search", "coffee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-01"))
        .stdout(predicate::str::contains("2024-03-02").not());
}

#[test]
#[serial]
fn test_stats_json_is_valid() {
    let temp_dir = TempDir::new().unwrap();

    daybook(&temp_dir)
        .args([
            "add",
            "--date",
            "2024-03-14",
            "--content",
            "three little words",
            "--mood",
            "Calm",
        ])
        .assert()
        .success();

    let output = daybook(&temp_dir)
        .args(["stats", "--from", "2024-03-01", "--to", "2024-03-31", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_entries"], 1);
    assert_eq!(report["total_words"], 3);
    assert_eq!(report["most_frequent_mood"]["name"], "Calm");
}

#[test]
#[serial]
fn test_streak_on_empty_journal() {
    let temp_dir = TempDir::new().unwrap();

    daybook(&temp_dir)
        .arg("streak")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 0 days"))
        .stdout(predicate::str::contains("Longest streak: 0 days"));
}

#[test]
#[serial]
fn test_unknown_mood_is_reported() {
    let temp_dir = TempDir::new().unwrap();

    daybook(&temp_dir)
        .args(["add", "--content", "x", "--mood", "Transcendent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown mood"));
}
