//! Scenario data model
//!
//! A [`Scenario`] is a plain value describing one exercise: the directories
//! it owns, an ordered script of file writes and tool steps, the checks that
//! must hold afterwards, and the text shown to the learner. Nothing here
//! performs I/O; [`crate::runner::ScenarioRunner`] executes it.
//!
//! File writes and tool steps are interleaved in one script because the
//! narrative needs it: some files exist before `init`, others change between
//! commits, and some are left modified on purpose after the last commit.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::content::{validate_relative, FileEntry};
use crate::error::{ProvisionError, Result};
use crate::types::ScenarioId;
use crate::vcs::GitOp;

/// One tool invocation in a scenario script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    /// The operation to run.
    pub op: GitOp,
    /// Working directory, relative to the workspace root (`.` is the root).
    pub cwd: PathBuf,
    /// Tolerate a non-zero exit. Used for the merge that is meant to stop
    /// on a conflict: the unmerged state is the deliverable.
    pub allow_failure: bool,
}

impl fmt::Display for HistoryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.cwd.display(), self.op)?;
        if self.allow_failure {
            write!(f, " (failure tolerated)")?;
        }
        Ok(())
    }
}

/// A single entry of a scenario script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write files into `dir` (relative to the workspace root).
    Write { dir: PathBuf, files: Vec<FileEntry> },
    /// Run a tool step.
    Run(HistoryStep),
    /// Claim a scratch directory, clearing any leftover. With `create` the
    /// directory is created empty, otherwise a later clone creates it.
    Scratch { path: PathBuf, create: bool },
    /// Remove a scratch directory claimed earlier.
    DropScratch { path: PathBuf },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write { dir, files } => {
                let names: Vec<String> = files
                    .iter()
                    .map(|entry| {
                        let mut name = entry.path.display().to_string();
                        if entry.executable {
                            name.push_str(" (+x)");
                        }
                        name
                    })
                    .collect();
                write!(f, "[{}] write {}", dir.display(), names.join(", "))
            }
            Self::Run(step) => write!(f, "{}", step),
            Self::Scratch { path, create } => {
                if *create {
                    write!(f, "scratch {} (created)", path.display())
                } else {
                    write!(f, "scratch {}", path.display())
                }
            }
            Self::DropScratch { path } => write!(f, "remove scratch {}", path.display()),
        }
    }
}

/// A property of the provisioned workspace checked after the last step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// `path` is unmerged in `repo` and holds exactly `blocks` conflict blocks.
    ConflictMarkers {
        repo: PathBuf,
        path: PathBuf,
        blocks: usize,
    },
    /// `repo` has `branch` checked out.
    CurrentBranch { repo: PathBuf, branch: String },
    /// `tip` is a strict fast-forward of `base`: their merge base is `base`.
    FastForward {
        repo: PathBuf,
        base: String,
        tip: String,
    },
    /// Tag `name` resolves in `repo`.
    Tag { repo: PathBuf, name: String },
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictMarkers { repo, path, blocks } => write!(
                f,
                "conflict({}/{}, blocks={})",
                repo.display(),
                path.display(),
                blocks
            ),
            Self::CurrentBranch { repo, branch } => {
                write!(f, "branch({} on {})", repo.display(), branch)
            }
            Self::FastForward { repo, base, tip } => {
                write!(f, "fast-forward({}: {} -> {})", repo.display(), base, tip)
            }
            Self::Tag { repo, name } => write!(f, "tag({} has {})", repo.display(), name),
        }
    }
}

/// The "a colleague pushed" procedure of a remote scenario.
///
/// Each run clones the bare remote into `scratch`, rewrites `file` from the
/// number of commits already on `branch`, commits, pushes and removes the
/// scratch clone. Rendering from the commit count makes every run's content
/// distinct, so repeated runs always add a new commit.
#[derive(Debug, Clone)]
pub struct RemoteUpdate {
    /// Bare repository, relative to the workspace root.
    pub remote: PathBuf,
    /// Scratch clone location, relative to the workspace root.
    pub scratch: PathBuf,
    /// Branch to update.
    pub branch: String,
    /// File rewritten by the update, relative to the clone.
    pub file: PathBuf,
    /// Content of `file` given the commit count before the update.
    pub render: fn(u32) -> String,
    /// Commit message given the commit count before the update.
    pub message: fn(u32) -> String,
    /// Next steps printed after a successful update.
    pub instructions: Vec<String>,
}

impl RemoteUpdate {
    /// Numbered rendering of the update procedure for `--update --dry-run`.
    pub fn summary(&self) -> String {
        let file = self.file.to_string_lossy().into_owned();
        let scratch = self.scratch.display();
        let steps = [
            format!("scratch {}", scratch),
            format!(
                "[.] {}",
                GitOp::clone_repo(self.remote.clone(), self.scratch.clone())
            ),
            format!("[{}] {}", scratch, GitOp::RevListCount { rev: self.branch.clone() }),
            format!("[{}] write {} (rendered from the count)", scratch, file),
            format!("[{}] {}", scratch, GitOp::add(&[file.as_str()])),
            format!("[{}] git commit (message rendered from the count)", scratch),
            format!("[{}] {}", scratch, GitOp::push_to("origin", &self.branch)),
            format!("remove scratch {}", scratch),
        ];
        let mut lines = vec![format!(
            "Remote update: {} ({})",
            self.remote.display(),
            self.branch
        )];
        for (i, step) in steps.iter().enumerate() {
            lines.push(format!("    {}. {}", i + 1, step));
        }
        lines.join("\n")
    }
}

/// One exercise's complete provisioning recipe.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub id: ScenarioId,
    pub title: String,
    /// The learner's directory, relative to the workspace root.
    pub target: PathBuf,
    /// Other guarded directories, e.g. a bare remote.
    pub auxiliary: Vec<PathBuf>,
    /// Ordered script.
    pub actions: Vec<Action>,
    /// Checks run after the script.
    pub expectations: Vec<Expectation>,
    /// One-line facts shown after setup.
    pub highlights: Vec<String>,
    /// Numbered instructions shown after setup.
    pub instructions: Vec<String>,
    /// Optional `--update` procedure.
    pub remote_update: Option<RemoteUpdate>,
}

impl Scenario {
    /// Directories guarded before anything is touched: target first.
    pub fn guarded_dirs(&self) -> Vec<PathBuf> {
        std::iter::once(self.target.clone())
            .chain(self.auxiliary.iter().cloned())
            .collect()
    }

    /// Tool steps in script order.
    pub fn steps(&self) -> impl Iterator<Item = &HistoryStep> {
        self.actions.iter().filter_map(|action| match action {
            Action::Run(step) => Some(step),
            _ => None,
        })
    }

    /// Branch names created anywhere in the script, in first-seen order.
    pub fn branches(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut names = Vec::new();
        for step in self.steps() {
            let name = match &step.op {
                GitOp::Init { initial_branch } => initial_branch,
                GitOp::CheckoutNew { branch } => branch,
                GitOp::Branch { name } => name,
                _ => continue,
            };
            if seen.insert(name.clone()) {
                names.push(name.clone());
            }
        }
        names
    }

    /// Tags created by the script.
    pub fn tags(&self) -> Vec<String> {
        self.steps()
            .filter_map(|step| match &step.op {
                GitOp::Tag { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Branch the learner ends up on, if the script decides it.
    pub fn final_branch(&self) -> Option<String> {
        let declared = self.expectations.iter().find_map(|exp| match exp {
            Expectation::CurrentBranch { repo, branch } if *repo == self.target => {
                Some(branch.clone())
            }
            _ => None,
        });
        if declared.is_some() {
            return declared;
        }
        self.steps()
            .filter(|step| step.cwd == self.target)
            .filter_map(|step| match &step.op {
                GitOp::Init { initial_branch } => Some(initial_branch.clone()),
                GitOp::Checkout { target } => Some(target.clone()),
                GitOp::CheckoutNew { branch } => Some(branch.clone()),
                _ => None,
            })
            .last()
    }

    /// Whether the script initialises or clones a repository at all.
    pub fn has_history(&self) -> bool {
        self.steps().next().is_some()
    }

    /// Check every path in the recipe before anything runs.
    ///
    /// - all directories and file paths are relative and stay inside the root
    /// - the target is not also listed as auxiliary
    /// - at most one step tolerates failure
    pub fn validate(&self) -> Result<()> {
        for dir in self.guarded_dirs() {
            validate_relative(&dir)?;
        }
        if self.auxiliary.contains(&self.target) {
            return Err(ProvisionError::invalid_path(
                &self.target,
                "target is listed twice",
            ));
        }
        for action in &self.actions {
            match action {
                Action::Write { dir, files } => {
                    validate_relative(dir)?;
                    for entry in files {
                        validate_relative(&entry.path)?;
                    }
                }
                Action::Run(step) => validate_relative(&step.cwd)?,
                Action::Scratch { path, .. } | Action::DropScratch { path } => {
                    validate_relative(path)?
                }
            }
        }
        let tolerated = self.steps().filter(|step| step.allow_failure).count();
        if tolerated > 1 {
            return Err(ProvisionError::invalid_path(
                &self.target,
                format!("{} steps tolerate failure, at most one may", tolerated),
            ));
        }
        if let Some(update) = &self.remote_update {
            validate_relative(&update.remote)?;
            validate_relative(&update.scratch)?;
            validate_relative(&update.file)?;
        }
        Ok(())
    }

    /// Returns a numbered rendering of the plan for `plan`/`--dry-run`.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Scenario: {} - {}", self.id, self.title),
            format!("  Target: {}", self.target.display()),
        ];
        if !self.auxiliary.is_empty() {
            let aux: Vec<String> = self
                .auxiliary
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            lines.push(format!("  Auxiliary: {}", aux.join(", ")));
        }
        lines.push(format!("  Actions ({}):", self.actions.len()));
        for (i, action) in self.actions.iter().enumerate() {
            lines.push(format!("    {}. {}", i + 1, action));
        }
        if !self.expectations.is_empty() {
            lines.push("  Checks:".to_string());
            for exp in &self.expectations {
                lines.push(format!("    - {}", exp));
            }
        }
        if let Some(update) = &self.remote_update {
            lines.push(format!(
                "  --update: push a new commit to {} ({}) via {}",
                update.remote.display(),
                update.branch,
                update.scratch.display()
            ));
        }
        lines.join("\n")
    }
}

/// Table-driven construction of a [`Scenario`].
///
/// Writes and steps go to the *current directory*, which starts as the
/// target and is changed with [`ScenarioBuilder::in_dir`].
#[derive(Debug)]
pub struct ScenarioBuilder {
    scenario: Scenario,
    cwd: PathBuf,
}

impl ScenarioBuilder {
    pub fn new(id: ScenarioId, title: &str, target: impl Into<PathBuf>) -> Self {
        let target = target.into();
        Self {
            cwd: target.clone(),
            scenario: Scenario {
                id,
                title: title.to_string(),
                target,
                auxiliary: Vec::new(),
                actions: Vec::new(),
                expectations: Vec::new(),
                highlights: Vec::new(),
                instructions: Vec::new(),
                remote_update: None,
            },
        }
    }

    /// Guard another directory alongside the target.
    pub fn auxiliary(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scenario.auxiliary.push(dir.into());
        self
    }

    /// Switch the directory used by following writes and steps.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = dir.into();
        self
    }

    /// Switch back to the workspace root.
    pub fn in_root(self) -> Self {
        self.in_dir(".")
    }

    /// Switch back to the target directory.
    pub fn in_target(mut self) -> Self {
        self.cwd = self.scenario.target.clone();
        self
    }

    pub fn write(mut self, files: impl IntoIterator<Item = FileEntry>) -> Self {
        self.scenario.actions.push(Action::Write {
            dir: self.cwd.clone(),
            files: files.into_iter().collect(),
        });
        self
    }

    pub fn git(self, op: GitOp) -> Self {
        self.step(op, false)
    }

    /// A step whose non-zero exit is the intended outcome.
    pub fn git_expect_failure(self, op: GitOp) -> Self {
        self.step(op, true)
    }

    /// Write one file, stage it and commit it.
    pub fn commit_file(self, file: FileEntry, message: &str) -> Self {
        let path = file.path.to_string_lossy().into_owned();
        self.write([file])
            .git(GitOp::add(&[path.as_str()]))
            .git(GitOp::commit(message))
    }

    fn step(mut self, op: GitOp, allow_failure: bool) -> Self {
        self.scenario.actions.push(Action::Run(HistoryStep {
            op,
            cwd: self.cwd.clone(),
            allow_failure,
        }));
        self
    }

    /// Claim a scratch directory and create it empty.
    pub fn scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.scenario.actions.push(Action::Scratch {
            path: path.into(),
            create: true,
        });
        self
    }

    /// Claim a scratch directory that a following clone creates.
    pub fn scratch_clone(mut self, path: impl Into<PathBuf>) -> Self {
        self.scenario.actions.push(Action::Scratch {
            path: path.into(),
            create: false,
        });
        self
    }

    pub fn drop_scratch(mut self, path: impl Into<PathBuf>) -> Self {
        self.scenario
            .actions
            .push(Action::DropScratch { path: path.into() });
        self
    }

    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.scenario.expectations.push(expectation);
        self
    }

    /// Expect the target to be on `branch` afterwards.
    pub fn ends_on(self, branch: &str) -> Self {
        let repo = self.scenario.target.clone();
        self.expect(Expectation::CurrentBranch {
            repo,
            branch: branch.to_string(),
        })
    }

    pub fn highlight(mut self, line: &str) -> Self {
        self.scenario.highlights.push(line.to_string());
        self
    }

    pub fn instructions(mut self, lines: &[&str]) -> Self {
        self.scenario
            .instructions
            .extend(lines.iter().map(|l| l.to_string()));
        self
    }

    pub fn remote_update(mut self, update: RemoteUpdate) -> Self {
        self.scenario.remote_update = Some(update);
        self
    }

    pub fn build(self) -> Scenario {
        self.scenario
    }
}

/// Path of `relative` under `root`, with `.` meaning the root itself.
pub fn resolve(root: &Path, relative: &Path) -> PathBuf {
    if relative == Path::new(".") {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}
