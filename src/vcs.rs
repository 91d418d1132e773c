//! Typed access to the version-control tool.
//!
//! Every invocation goes through [`VcsTool::run`] with a [`GitOp`], never a
//! raw argument vector. `GitOp` is the single source of truth for how an
//! operation maps onto the command line, so a flag typo is a compile error
//! in one place rather than a runtime failure in twenty scenarios.
//!
//! Two implementations exist:
//! - [`GitCli`] spawns the real binary as a blocking subprocess.
//! - [`RecordingTool`] records calls and answers from a script, for tests.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{ProvisionError, Result};

/// Per-invocation settings that keep scripted history independent of the
/// learner's own git configuration.
const CONFIG_OVERRIDES: &[&str] = &[
    "-c",
    "commit.gpgsign=false",
    "-c",
    "tag.gpgsign=false",
    "-c",
    "core.autocrlf=false",
];

/// A single version-control operation with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOp {
    /// `git init -b <branch>`
    Init { initial_branch: String },
    /// `git add -- <paths>`
    Add { paths: Vec<String> },
    /// `git commit -m <message>`
    Commit { message: String },
    /// `git branch <name>` (create without switching)
    Branch { name: String },
    /// `git checkout <target>`
    Checkout { target: String },
    /// `git checkout -b <branch>`
    CheckoutNew { branch: String },
    /// `git merge --no-edit [--no-ff] <branch>`
    Merge { branch: String, no_ff: bool },
    /// `git tag <name>` or `git tag -a <name> -m <message>`
    Tag { name: String, message: Option<String> },
    /// `git cherry-pick <rev>`
    CherryPick { rev: String },
    /// `git stash push [-m <message>]`
    Stash { message: Option<String> },
    /// `git clone --bare <source> <dest>`
    CloneBare { source: PathBuf, dest: PathBuf },
    /// `git clone <source> <dest>`
    Clone { source: PathBuf, dest: PathBuf },
    /// `git push [<remote> [<branch>]]`
    Push { remote: Option<String>, branch: Option<String> },
    /// `git pull --no-rebase [<remote> [<branch>]]`
    Pull { remote: Option<String>, branch: Option<String> },
    /// `git fetch [<remote>]`
    Fetch { remote: Option<String> },
    /// `git rev-list --count <rev>`
    RevListCount { rev: String },
    /// `git rev-parse <rev>`
    RevParse { rev: String },
    /// `git rev-parse --abbrev-ref HEAD`
    CurrentBranch,
    /// `git merge-base <a> <b>`
    MergeBase { a: String, b: String },
    /// `git ls-files -u`
    ListUnmerged,
    /// `git --version`
    Version,
}

impl GitOp {
    pub fn init(initial_branch: &str) -> Self {
        Self::Init {
            initial_branch: initial_branch.to_string(),
        }
    }

    /// Stage everything in the working tree.
    pub fn add_all() -> Self {
        Self::Add {
            paths: vec![".".to_string()],
        }
    }

    pub fn add(paths: &[&str]) -> Self {
        Self::Add {
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn commit(message: &str) -> Self {
        Self::Commit {
            message: message.to_string(),
        }
    }

    pub fn branch(name: &str) -> Self {
        Self::Branch {
            name: name.to_string(),
        }
    }

    pub fn checkout(target: &str) -> Self {
        Self::Checkout {
            target: target.to_string(),
        }
    }

    pub fn checkout_new(branch: &str) -> Self {
        Self::CheckoutNew {
            branch: branch.to_string(),
        }
    }

    pub fn merge(branch: &str) -> Self {
        Self::Merge {
            branch: branch.to_string(),
            no_ff: false,
        }
    }

    pub fn annotated_tag(name: &str, message: &str) -> Self {
        Self::Tag {
            name: name.to_string(),
            message: Some(message.to_string()),
        }
    }

    pub fn clone_bare(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self::CloneBare {
            source: source.into(),
            dest: dest.into(),
        }
    }

    pub fn clone_repo(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self::Clone {
            source: source.into(),
            dest: dest.into(),
        }
    }

    /// `git push` to the configured upstream.
    pub fn push() -> Self {
        Self::Push {
            remote: None,
            branch: None,
        }
    }

    pub fn push_to(remote: &str, branch: &str) -> Self {
        Self::Push {
            remote: Some(remote.to_string()),
            branch: Some(branch.to_string()),
        }
    }

    /// Convert to command-line arguments, excluding the binary itself.
    pub fn to_cli_args(&self) -> Vec<String> {
        let s = |v: &str| v.to_string();
        let path = |p: &Path| p.to_string_lossy().into_owned();
        match self {
            Self::Init { initial_branch } => vec![s("init"), s("-b"), initial_branch.clone()],
            Self::Add { paths } => {
                let mut args = vec![s("add"), s("--")];
                args.extend(paths.iter().cloned());
                args
            }
            Self::Commit { message } => vec![s("commit"), s("-m"), message.clone()],
            Self::Branch { name } => vec![s("branch"), name.clone()],
            Self::Checkout { target } => vec![s("checkout"), target.clone()],
            Self::CheckoutNew { branch } => vec![s("checkout"), s("-b"), branch.clone()],
            Self::Merge { branch, no_ff } => {
                let mut args = vec![s("merge"), s("--no-edit")];
                if *no_ff {
                    args.push(s("--no-ff"));
                }
                args.push(branch.clone());
                args
            }
            Self::Tag { name, message } => match message {
                Some(message) => vec![s("tag"), s("-a"), name.clone(), s("-m"), message.clone()],
                None => vec![s("tag"), name.clone()],
            },
            Self::CherryPick { rev } => vec![s("cherry-pick"), rev.clone()],
            Self::Stash { message } => {
                let mut args = vec![s("stash"), s("push")];
                if let Some(message) = message {
                    args.push(s("-m"));
                    args.push(message.clone());
                }
                args
            }
            Self::CloneBare { source, dest } => {
                vec![s("clone"), s("--bare"), path(source), path(dest)]
            }
            Self::Clone { source, dest } => vec![s("clone"), path(source), path(dest)],
            Self::Push { remote, branch } => {
                let mut args = vec![s("push")];
                args.extend(remote.iter().cloned());
                args.extend(branch.iter().cloned());
                args
            }
            Self::Pull { remote, branch } => {
                let mut args = vec![s("pull"), s("--no-rebase")];
                args.extend(remote.iter().cloned());
                args.extend(branch.iter().cloned());
                args
            }
            Self::Fetch { remote } => {
                let mut args = vec![s("fetch")];
                args.extend(remote.iter().cloned());
                args
            }
            Self::RevListCount { rev } => vec![s("rev-list"), s("--count"), rev.clone()],
            Self::RevParse { rev } => vec![s("rev-parse"), rev.clone()],
            Self::CurrentBranch => vec![s("rev-parse"), s("--abbrev-ref"), s("HEAD")],
            Self::MergeBase { a, b } => vec![s("merge-base"), a.clone(), b.clone()],
            Self::ListUnmerged => vec![s("ls-files"), s("-u")],
            Self::Version => vec![s("--version")],
        }
    }

    /// Anchor relative clone paths at `root`, so the remote URL the learner's
    /// clone records does not depend on where the command was started.
    pub fn rooted(&self, root: &Path) -> GitOp {
        let anchor = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        match self {
            Self::CloneBare { source, dest } => Self::CloneBare {
                source: anchor(source),
                dest: anchor(dest),
            },
            Self::Clone { source, dest } => Self::Clone {
                source: anchor(source),
                dest: anchor(dest),
            },
            other => other.clone(),
        }
    }

    /// Read-only operations never change repository state.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::RevListCount { .. }
                | Self::RevParse { .. }
                | Self::CurrentBranch
                | Self::MergeBase { .. }
                | Self::ListUnmerged
                | Self::Version
        )
    }
}

impl fmt::Display for GitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git")?;
        for arg in self.to_cli_args() {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Output from a tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Standard output of the tool.
    pub stdout: String,
    /// Standard error of the tool.
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the tool exited successfully (exit code 0).
    pub success: bool,
}

impl ToolOutput {
    /// A successful invocation printing `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
        }
    }

    /// A failed invocation with exit code `code`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(code),
            success: false,
        }
    }

    /// Turn a failed invocation into a `StepFailure` for step `step_index`.
    pub fn ensure_success(&self, step_index: usize, op: &GitOp) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(ProvisionError::StepFailure {
                step_index,
                step: op.to_string(),
                exit_code: self.exit_code,
                stderr: self.stderr.clone(),
            })
        }
    }

    /// First line of stdout, trimmed. Most queries print a single value.
    pub fn value(&self) -> &str {
        self.stdout.lines().next().unwrap_or("").trim()
    }
}

/// The narrow interface the engine has onto the version-control tool.
///
/// # Contract
///
/// - `run` blocks until the tool exits.
/// - A non-zero exit is reported through `ToolOutput::success`, not `Err`.
/// - `Err` means the tool could not be started at all.
pub trait VcsTool {
    fn run(&self, cwd: &Path, op: &GitOp) -> Result<ToolOutput>;
}

/// Identity recorded on every scripted commit and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// The real `git` binary, run as a blocking subprocess.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
    identity: Identity,
}

impl GitCli {
    pub fn new(binary: impl Into<String>, identity: Identity) -> Self {
        Self {
            binary: binary.into(),
            identity,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl VcsTool for GitCli {
    fn run(&self, cwd: &Path, op: &GitOp) -> Result<ToolOutput> {
        let args = op.to_cli_args();
        info!("{} {:?} (in {})", self.binary, args, cwd.display());

        // stdin is null: nothing scripted may ever wait on an editor or prompt
        let output = Command::new(&self.binary)
            .args(CONFIG_OVERRIDES)
            .args(&args)
            .current_dir(cwd)
            .env("GIT_AUTHOR_NAME", &self.identity.name)
            .env("GIT_AUTHOR_EMAIL", &self.identity.email)
            .env("GIT_COMMITTER_NAME", &self.identity.name)
            .env("GIT_COMMITTER_EMAIL", &self.identity.email)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_MERGE_AUTOEDIT", "no")
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ProvisionError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        let result = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
        };
        if !result.success {
            debug!(
                "{} exited with {:?}: {}",
                op,
                result.exit_code,
                result.stderr.trim()
            );
        }
        Ok(result)
    }
}

/// One invocation seen by a [`RecordingTool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub cwd: PathBuf,
    pub op: GitOp,
}

type Responder = Box<dyn Fn(&GitOp) -> Option<ToolOutput>>;

/// A fake tool that records every call instead of running anything.
///
/// By default every call succeeds with empty output, except
/// `rev-list --count`, which answers `1`. Responses can be scripted with
/// [`RecordingTool::respond_with`], and [`RecordingTool::failing_at`] makes
/// the n-th invocation (zero-based) exit with code 1.
#[derive(Default)]
pub struct RecordingTool {
    calls: RefCell<Vec<RecordedCall>>,
    fail_at: Option<usize>,
    responder: Option<Responder>,
}

impl RecordingTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(mut self, invocation: usize) -> Self {
        self.fail_at = Some(invocation);
        self
    }

    pub fn respond_with(mut self, responder: impl Fn(&GitOp) -> Option<ToolOutput> + 'static) -> Self {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Just the operations, in order.
    pub fn ops(&self) -> Vec<GitOp> {
        self.calls.borrow().iter().map(|c| c.op.clone()).collect()
    }
}

impl fmt::Debug for RecordingTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingTool")
            .field("calls", &self.calls.borrow().len())
            .field("fail_at", &self.fail_at)
            .finish()
    }
}

impl VcsTool for RecordingTool {
    fn run(&self, cwd: &Path, op: &GitOp) -> Result<ToolOutput> {
        let index = {
            let mut calls = self.calls.borrow_mut();
            calls.push(RecordedCall {
                cwd: cwd.to_path_buf(),
                op: op.clone(),
            });
            calls.len() - 1
        };

        if self.fail_at == Some(index) {
            return Ok(ToolOutput::failed(1, format!("simulated failure of `{}`", op)));
        }
        if let Some(output) = self.responder.as_ref().and_then(|respond| respond(op)) {
            return Ok(output);
        }
        Ok(match op {
            GitOp::RevListCount { .. } => ToolOutput::ok("1\n"),
            _ => ToolOutput::ok(""),
        })
    }
}
