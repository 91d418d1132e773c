//! Exercises 1-4: first repository, ignoring files, diff, restore.

use crate::content::FileEntry;
use crate::scenario::{Scenario, ScenarioBuilder};
use crate::types::ScenarioId;
use crate::vcs::GitOp;

use super::MAIN;

const INIT_README: &str = "# 🚀 Exercise: My first commit

## 🎯 Goal
Initialise a Git repository, track README.md and create your first commit.

## 📋 Steps

1. **Initialise the repository**: `git init`
2. **Check the state**: `git status` (README.md shows up in red)
3. **Stage the file**: `git add README.md`
4. **Create the commit**: `git commit -m \"My first commit\"`
5. **Read the history**: `git log`

💡 **Tip**: run `git status` after every command and watch what changes!
";

pub(super) fn init() -> Scenario {
    ScenarioBuilder::new(ScenarioId::Init, "Exercise ready: my first commit", "ex01-init")
        .write([FileEntry::new("README.md", INIT_README)])
        .highlight("📄 README.md created (not tracked yet)")
        .instructions(&[
            "Enter the ex01-init directory",
            "Initialise a new Git repository",
            "Check the repository state",
            "Stage README.md",
            "Create your first commit with a descriptive message",
            "Look at the commit history",
        ])
        .build()
}

const IGNORE_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>My site</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <h1>Welcome</h1>
    <p>This site is versioned with Git.</p>
</body>
</html>
"#;

const IGNORE_STYLE: &str = "body {
    font-family: Arial, sans-serif;
    margin: 2rem;
}

h1 {
    color: #2c3e50;
}
";

const IGNORE_NOTES: &str = "Personal notes
--------------
- Finish the home page
- Pick a colour palette
";

const IGNORE_SECRET: &str = "# DO NOT COMMIT THIS FILE
API_KEY=sk-training-0000000000000000
DB_PASSWORD=correct-horse-battery-staple
";

const IGNORE_README: &str = "# 🙈 Exercise: ignoring files with .gitignore

## 🎯 Goal
Version the project without ever committing `secret.txt`.

## 📁 Files
- `index.html`, `style.css`, `notes.txt`: project files
- `secret.txt`: credentials that must never reach the repository

## 📋 Steps

1. Initialise a repository: `git init`
2. Create a `.gitignore` file containing `secret.txt`
3. Check with `git status` that `secret.txt` no longer shows up
4. Stage everything else and commit (do not forget `.gitignore` itself)
5. Verify with `git ls-files` that `secret.txt` is not tracked

## 💡 Tips
- `.gitignore` accepts patterns: `*.log`, `build/`, `!keep.log`
- `git check-ignore -v secret.txt` tells you which rule matched
";

pub(super) fn gitignore() -> Scenario {
    ScenarioBuilder::new(
        ScenarioId::Gitignore,
        "Exercise ready: ignoring files",
        "ex02-ignore",
    )
    .write([
        FileEntry::new("README.md", IGNORE_README),
        FileEntry::new("index.html", IGNORE_INDEX),
        FileEntry::new("style.css", IGNORE_STYLE),
        FileEntry::new("notes.txt", IGNORE_NOTES),
        FileEntry::new("secret.txt", IGNORE_SECRET),
    ])
    .highlight("📄 Files: README.md, index.html, style.css, notes.txt, secret.txt")
    .instructions(&[
        "Enter the ex02-ignore directory",
        "Initialise a new Git repository",
        "Create a .gitignore that ignores secret.txt",
        "Stage every tracked file",
        "Commit with a descriptive message",
        "Check that secret.txt is not versioned",
    ])
    .build()
}

const DIFF_ARTICLE: &str = "# Learning Git

## Introduction

Git is a distributed version control system.
It keeps the full history of a project.

## Why use it?

Every change is recorded, so you can always go back.
";

const DIFF_README: &str = "# 🔍 Exercise: observing changes with git diff

## 🎯 Goal
See exactly what changed before and after staging.

## 📁 Initial state
- `article.md` is committed

## 📋 Steps

1. Edit `article.md`: add a paragraph and rename a heading
2. `git diff`: changes not staged yet
3. `git add article.md` then `git diff --staged`
4. Commit, then `git log -p -1` to see the diff of the last commit

## 💡 Tips
- `git diff` compares the working tree with the index
- `git diff --staged` compares the index with the last commit
";

pub(super) fn diff() -> Scenario {
    ScenarioBuilder::new(ScenarioId::Diff, "Exercise ready: git diff", "ex03-diff")
        .write([
            FileEntry::new("README.md", DIFF_README),
            FileEntry::new("article.md", DIFF_ARTICLE),
        ])
        .git(GitOp::init(MAIN))
        .git(GitOp::add(&["README.md", "article.md"]))
        .git(GitOp::commit("Initial commit: add article.md"))
        .ends_on(MAIN)
        .highlight("📄 README.md and article.md are committed")
        .highlight("🔧 Repository initialised with 1 commit")
        .instructions(&[
            "Edit article.md (add a paragraph and change a heading)",
            "Inspect the changes with the appropriate commands",
            "Stage the file and create a commit",
            "Show the history and the diff of the last commit",
        ])
        .build()
}

const RESTORE_CONFIG: &str = "app:
  name: training-app
  port: 8080
  debug: false

database:
  host: localhost
  port: 5432
";

const RESTORE_CONFIG_BROKEN: &str = "app:
  name: training-app
  port: 9999
  debug: true
  experimental: maybe

database:
  host: 10.0.0.42
  port: 5432
";

const RESTORE_APP_README: &str = "# Training App

Small demo application.
";

const RESTORE_APP_README_EDITED: &str = "# Training App

Small demo application.

## Installation
Run `make install`, then `make run`.
";

const RESTORE_EXERCISE: &str = "# ↩️ Exercise: discarding changes with git restore

## 🎯 Goal
Throw away unwanted edits in one file while keeping the others.

## 📁 Initial state
- `config.yml` was edited by mistake (wrong port, debug enabled)
- `README.md` was edited on purpose (new Installation section)
- Neither change is staged

## 📋 Steps

1. `git status`: both files are modified
2. `git diff config.yml` and `git diff README.md`
3. Discard only the changes to `config.yml`: `git restore config.yml`
4. Check that `README.md` is still modified

## 💡 Tips
- `git restore <file>` cannot be undone: the edits are gone for good
- `git restore --staged <file>` unstages without touching the file
";

pub(super) fn restore() -> Scenario {
    ScenarioBuilder::new(
        ScenarioId::Restore,
        "Exercise ready: git restore",
        "ex04-restore",
    )
    .write([
        FileEntry::new("EXERCISE.md", RESTORE_EXERCISE),
        FileEntry::new("config.yml", RESTORE_CONFIG),
        FileEntry::new("README.md", RESTORE_APP_README),
    ])
    .git(GitOp::init(MAIN))
    .git(GitOp::add_all())
    .git(GitOp::commit("Initial commit: base configuration"))
    // left unstaged on purpose
    .write([
        FileEntry::new("config.yml", RESTORE_CONFIG_BROKEN),
        FileEntry::new("README.md", RESTORE_APP_README_EDITED),
    ])
    .ends_on(MAIN)
    .highlight("🔧 Repository initialised with 1 commit")
    .highlight("⚡ Unstaged changes in config.yml and README.md")
    .instructions(&[
        "Check the repository state",
        "Review the changes in each file",
        "Discard only the changes to config.yml",
        "Check that README.md is still modified",
    ])
    .build()
}
