//! Exercises 15-17: a shared bare repository next to the learner's clone.
//!
//! Each scenario seeds the remote the same way: build a throwaway repository
//! in a scratch directory, `clone --bare` it into place and drop the scratch.

use crate::content::FileEntry;
use crate::scenario::{RemoteUpdate, Scenario, ScenarioBuilder};
use crate::types::ScenarioId;
use crate::vcs::GitOp;

use super::MAIN;

/// Build a one-commit bare repository at `remote` from `files`.
fn seed_remote(
    builder: ScenarioBuilder,
    scratch: &str,
    remote: &str,
    files: Vec<FileEntry>,
    message: &str,
) -> ScenarioBuilder {
    builder
        .scratch_dir(scratch)
        .in_dir(scratch)
        .git(GitOp::init(MAIN))
        .write(files)
        .git(GitOp::add_all())
        .git(GitOp::commit(message))
        .in_root()
        .git(GitOp::clone_bare(scratch, remote))
        .drop_scratch(scratch)
}

const SHARED_README: &str = "# Shared project

Project shared by the whole team through `remote-repo.git`.

Current release: 1.0
";

fn shared_readme_release(count: u32) -> String {
    format!(
        "# Shared project

Project shared by the whole team through `remote-repo.git`.

Current release: 1.{count}

## What's new in 1.{count}
- Faster startup
- Fixed the login timeout
"
    )
}

fn shared_release_message(count: u32) -> String {
    format!("Release 1.{}: new features and fixes", count)
}

const REMOTE_EXERCISE: &str = "# 📡 Exercise: fetch and pull

## 🎯 Goal
Get a colleague's work from the shared repository.

## 📁 Initial state
- `../remote-repo.git`: the shared (bare) repository
- this directory: your clone, `origin` points at the shared repository

## 📋 Steps

1. `git remote -v`: check where `origin` points
2. Ask for a colleague's push: `git-trainer setup remote --update`
3. `git fetch`: download without touching your branch
4. `git log --oneline main..origin/main`: what is new?
5. `git pull`: integrate it into `main`

## 💡 Tips
- `fetch` never changes your files, `pull` = `fetch` + `merge`
- `git status` tells you when you are behind `origin/main`
";

pub(super) fn remote() -> Scenario {
    let builder = ScenarioBuilder::new(
        ScenarioId::Remote,
        "Exercise ready: remote repositories",
        "ex15-remote",
    )
    .auxiliary("remote-repo.git");
    seed_remote(
        builder,
        "_temp_init",
        "remote-repo.git",
        vec![FileEntry::new("README.md", SHARED_README)],
        "Initial commit: shared project",
    )
    .git(GitOp::clone_repo("remote-repo.git", "ex15-remote"))
    .in_target()
    .write([FileEntry::new("EXERCISE.md", REMOTE_EXERCISE)])
    .git(GitOp::add(&["EXERCISE.md"]))
    .git(GitOp::commit("Add exercise instructions"))
    .ends_on(MAIN)
    .highlight("🔗 Remote configured: origin -> remote-repo.git")
    .instructions(&[
        "Inspect the configured remote",
        "Simulate a colleague's push with `git-trainer setup remote --update`",
        "Fetch the remote changes",
        "Compare main with origin/main",
        "Pull the changes into main",
    ])
    .remote_update(RemoteUpdate {
        remote: "remote-repo.git".into(),
        scratch: "_temp_push".into(),
        branch: MAIN.into(),
        file: "README.md".into(),
        render: shared_readme_release,
        message: shared_release_message,
        instructions: vec![
            "cd ex15-remote".into(),
            "git fetch".into(),
            "git log --oneline main..origin/main".into(),
            "git pull".into(),
        ],
    })
    .build()
}

const PUSH_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Agency</title>
</head>
<body>
    <h1>Welcome to the agency</h1>
    <a href="about.html">About us</a>
</body>
</html>
"#;

const PUSH_ABOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>About</title>
</head>
<body>
    <h1>About us</h1>
    <p>A small team building fast websites.</p>
</body>
</html>
"#;

const PUSH_README: &str = "# 🚀 Exercise: publishing a branch with git push

## 🎯 Goal
Share a new branch with the team.

## 📁 Initial state
- `../remote-ex16.git`: the shared repository, only `main` exists there
- your clone is up to date with `origin/main`

## 📋 Steps

1. `git switch -c feature-contact`
2. Create `contact.html`, `git add` and `git commit`
3. `git push -u origin feature-contact`
4. `git branch -r`: `origin/feature-contact` now exists
5. `git status`: your branch tracks its remote counterpart

## 💡 Tips
- `-u` (`--set-upstream`) lets later pushes be a plain `git push`
- `git push origin --delete feature-contact` removes the remote branch
";

pub(super) fn push() -> Scenario {
    let builder = ScenarioBuilder::new(ScenarioId::Push, "Exercise ready: git push", "ex16-push")
        .auxiliary("remote-ex16.git");
    seed_remote(
        builder,
        "_temp_ex16",
        "remote-ex16.git",
        vec![
            FileEntry::new("index.html", PUSH_INDEX),
            FileEntry::new("about.html", PUSH_ABOUT),
        ],
        "Initial commit: home and about pages",
    )
    .git(GitOp::clone_repo("remote-ex16.git", "ex16-push"))
    .in_target()
    .commit_file(FileEntry::new("README.md", PUSH_README), "Add README")
    .git(GitOp::push())
    .ends_on(MAIN)
    .highlight("🌿 Only the main branch exists on origin")
    .instructions(&[
        "Create a feature-contact branch",
        "Add contact.html and commit it",
        "Publish the branch on origin",
        "Check the remote branches",
    ])
    .build()
}

const PULL_CONFIG_BASE: &str = r#"{
  "app": "inventory",
  "version": "1.0.0",
  "environment": "development",
  "features": {
    "export": false
  }
}
"#;

const PULL_CONFIG_REMOTE: &str = r#"{
  "app": "inventory",
  "version": "1.1.0",
  "environment": "production",
  "features": {
    "export": false
  }
}
"#;

const PULL_CONFIG_LOCAL: &str = r#"{
  "app": "inventory",
  "version": "1.0.1",
  "environment": "staging",
  "features": {
    "export": false
  }
}
"#;

const PULL_README: &str = "# ⚔️ Exercise: conflict on git pull

## 🎯 Goal
Integrate a colleague's push that conflicts with your local commit.

## 📁 Initial state
- A colleague pushed `config.json` with version 1.1.0 for production
- You committed `config.json` with version 1.0.1 for staging
- You have not pulled yet

## 📋 Steps

1. `git pull`: the merge stops on a conflict in `config.json`
2. `git status` and open `config.json`
3. Pick the right version and environment, remove the markers
4. `git add config.json` then `git commit`
5. `git log --oneline --graph` and `git push`

## 💡 Tips
- `git pull --rebase` replays your commit on top instead of merging
- `git merge --abort` cancels the pull's merge
";

pub(super) fn pull_conflict() -> Scenario {
    let builder = ScenarioBuilder::new(
        ScenarioId::PullConflict,
        "Exercise ready: pull conflict",
        "ex17-pull-conflict",
    )
    .auxiliary("remote-ex17.git");
    seed_remote(
        builder,
        "_temp_ex17",
        "remote-ex17.git",
        vec![
            FileEntry::new("config.json", PULL_CONFIG_BASE),
            FileEntry::new("README.md", PULL_README),
        ],
        "Initial commit: base configuration",
    )
    .git(GitOp::clone_repo("remote-ex17.git", "ex17-pull-conflict"))
    // a colleague pushes first
    .scratch_clone("_temp_remote_ex17")
    .git(GitOp::clone_repo("remote-ex17.git", "_temp_remote_ex17"))
    .in_dir("_temp_remote_ex17")
    .commit_file(
        FileEntry::new("config.json", PULL_CONFIG_REMOTE),
        "Release v1.1.0 to production",
    )
    .git(GitOp::push())
    .drop_scratch("_temp_remote_ex17")
    .in_target()
    .commit_file(
        FileEntry::new("config.json", PULL_CONFIG_LOCAL),
        "Staging configuration v1.0.1",
    )
    .ends_on(MAIN)
    .highlight("⚔️  Conflict prepared: origin and your clone changed config.json differently")
    .instructions(&[
        "Try a git pull",
        "Look at the conflict in config.json",
        "Resolve the conflict",
        "Conclude the merge and check the history",
    ])
    .build()
}
