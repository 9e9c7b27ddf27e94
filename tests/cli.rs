use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_sync_subcommand() {
    Command::cargo_bin("gemini-archive")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn sync_requires_a_config_argument() {
    Command::cargo_bin("gemini-archive")
        .unwrap()
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn sync_with_a_missing_config_file_fails_before_launching_anything() {
    Command::cargo_bin("gemini-archive")
        .unwrap()
        .args(["sync", "--config", "/nonexistent/archive.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
