//! Exit codes and output of the `git-trainer` binary.

mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn trainer(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-trainer"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("GIT_TRAINER_GIT")
        .output()
        .unwrap()
}

#[test]
fn test_list_shows_all_exercises() {
    let tmp = TempDir::new().unwrap();
    let output = trainer(tmp.path(), &["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 20);
    assert!(stdout.contains("conflict-simple"));
    assert!(stdout.contains("ex20-bisect"));
}

#[test]
fn test_existing_directory_exits_with_one() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("ex01-init")).unwrap();

    let output = trainer(tmp.path(), &["setup", "init"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--force"));
    // one diagnostic line, no duplicate log record
    let mentions: Vec<&str> = stderr.lines().filter(|l| l.contains("already exists")).collect();
    assert_eq!(mentions.len(), 1, "{stderr}");
    assert!(mentions[0].starts_with("❌ "));
    assert!(fs::read_dir(tmp.path().join("ex01-init")).unwrap().next().is_none());
}

#[test]
fn test_setup_without_history_needs_no_git() {
    let tmp = TempDir::new().unwrap();
    let output = trainer(tmp.path(), &["setup", "1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✅ Exercise ready: my first commit"));
    assert!(stdout.contains("📚 Instructions:"));
    assert!(tmp.path().join("ex01-init/README.md").is_file());
}

#[test]
fn test_dry_run_touches_nothing() {
    let tmp = TempDir::new().unwrap();
    let output = trainer(tmp.path(), &["setup", "remote", "--dry-run"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Scenario: remote"));
    assert!(stdout.contains("--update"));
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
}

#[test]
fn test_update_dry_run_shows_update_procedure() {
    let tmp = TempDir::new().unwrap();
    let output = trainer(tmp.path(), &["setup", "remote", "--update", "--dry-run"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("remote-repo.git does not exist"));

    fs::create_dir(tmp.path().join("remote-repo.git")).unwrap();
    let output = trainer(tmp.path(), &["setup", "remote", "--update", "--dry-run"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Remote update: remote-repo.git (main)"));
    assert!(stdout.contains("git push origin main"));
    assert!(!stdout.contains("Scenario: remote"));
    assert!(!tmp.path().join("_temp_push").exists());
}

#[test]
fn test_update_unsupported_exits_with_one() {
    let tmp = TempDir::new().unwrap();
    let output = trainer(tmp.path(), &["setup", "tags", "--update"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no remote update procedure"));
}

#[test]
fn test_update_before_setup_exits_with_one() {
    let tmp = TempDir::new().unwrap();
    let output = trainer(tmp.path(), &["setup", "remote", "--update"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("remote-repo.git does not exist"));
}

#[test]
fn test_missing_git_binary_fails_check() {
    let tmp = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_git-trainer"))
        .args(["check", "--root"])
        .arg(tmp.path())
        .env("GIT_TRAINER_GIT", "git-trainer-no-such-binary")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Cannot run"));
}

#[test]
fn test_setup_conflict_exercise() {
    require_git!();
    let tmp = TempDir::new().unwrap();
    let output = trainer(tmp.path(), &["setup", "conflict-simple"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Current branch: version-client"));

    // second run without --force refuses, with --force succeeds
    assert_eq!(trainer(tmp.path(), &["setup", "conflict-simple"]).status.code(), Some(1));
    assert!(
        trainer(tmp.path(), &["setup", "conflict-simple", "--force"])
            .status
            .success()
    );
}
