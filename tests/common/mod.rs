//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use git_trainer::vcs::{GitCli, Identity};

/// True when a `git` binary can be run. Tests needing real history return
/// early otherwise.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Skip the calling test when git is missing.
#[macro_export]
macro_rules! require_git {
    () => {
        if !common::git_available() {
            eprintln!("git not found, skipping");
            return;
        }
    };
}

pub fn git_cli() -> GitCli {
    GitCli::new(
        "git",
        Identity {
            name: "Test Trainer".to_string(),
            email: "test@example.com".to_string(),
        },
    )
}

/// Run git in `dir` and return stdout without the trailing newline. Leading
/// whitespace is kept, porcelain formats depend on it. Panics on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("LC_ALL", "C")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

/// Every regular file under `dir` except `.git` internals, with content.
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(dir, dir, &mut files);
    files
}

fn collect(base: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.file_name().is_some_and(|name| name == ".git") {
            continue;
        }
        if path.is_dir() {
            collect(base, &path, files);
        } else {
            let rel = path.strip_prefix(base).unwrap().to_path_buf();
            files.insert(rel, fs::read(&path).unwrap());
        }
    }
}
