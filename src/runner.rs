//! Scenario orchestration: guard, populate, verify, report.
//!
//! # Lifecycle
//!
//! 1. Validate the recipe (pure, nothing touched).
//! 2. Guard every owned directory, all or nothing.
//! 3. Replay the script: file writes and tool steps in order.
//! 4. Remove scratch directories, whatever happened.
//! 5. Check the scenario's expectations.
//! 6. Build the [`Report`].
//!
//! A failure in step 1 or 2 leaves the filesystem untouched. A failure in
//! step 3 or 5 leaves the partial directory for inspection; rerunning with
//! `--force` recovers.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::content::{materialize, FileEntry};
use crate::error::{ProvisionError, Result};
use crate::history::{HistoryScripter, StepOutcome};
use crate::report::Report;
use crate::scenario::{resolve, Action, HistoryStep, RemoteUpdate, Scenario};
use crate::vcs::{GitOp, VcsTool};
use crate::verify;
use crate::workspace_guard::{self, ScratchDir, WorkspaceState};

/// Result of a full run: the report plus every step outcome.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    pub steps: Vec<StepOutcome>,
}

/// Applies scenarios under one workspace root.
pub struct ScenarioRunner<'a> {
    tool: &'a dyn VcsTool,
    root: PathBuf,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(tool: &'a dyn VcsTool, root: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Provision `scenario`, recreating existing directories only if `force`.
    pub fn run(&self, scenario: &Scenario, force: bool) -> Result<Report> {
        self.run_detailed(scenario, force).map(|outcome| outcome.report)
    }

    /// Like [`ScenarioRunner::run`], also returning every step outcome.
    pub fn run_detailed(&self, scenario: &Scenario, force: bool) -> Result<RunOutcome> {
        scenario.validate()?;
        info!("Provisioning {} under {}", scenario.id, self.root.display());

        let guarded: Vec<PathBuf> = scenario
            .guarded_dirs()
            .iter()
            .map(|dir| resolve(&self.root, dir))
            .collect();
        workspace_guard::ensure_clean_all(&guarded, force)?;

        let scripter = HistoryScripter::new(self.tool);
        let steps = self.replay(&scripter, &scenario.actions)?;

        verify::check_all(&scripter, &self.root, &scenario.expectations)?;
        info!("Provisioned {} ({} tool steps)", scenario.id, steps.len());

        Ok(RunOutcome {
            report: Report::for_scenario(scenario, guarded),
            steps,
        })
    }

    fn replay(&self, scripter: &HistoryScripter<'_>, actions: &[Action]) -> Result<Vec<StepOutcome>> {
        // dropped on every exit path, which removes the directories
        let mut scratch: HashMap<PathBuf, ScratchDir> = HashMap::new();
        let mut outcomes = Vec::new();

        for action in actions {
            match action {
                Action::Write { dir, files } => {
                    materialize(&resolve(&self.root, dir), files)?;
                }
                Action::Run(step) => {
                    outcomes.push(scripter.apply_step(outcomes.len(), step, &self.root)?);
                }
                Action::Scratch { path, create } => {
                    let dir = ScratchDir::claim(resolve(&self.root, path))?;
                    if *create {
                        fs::create_dir_all(dir.path()).map_err(|e| {
                            ProvisionError::io(format!("creating {}", dir.path().display()), e)
                        })?;
                    }
                    scratch.insert(path.clone(), dir);
                }
                Action::DropScratch { path } => {
                    if scratch.remove(path).is_none() {
                        debug!("Scratch {} was never claimed", path.display());
                    }
                }
            }
        }
        Ok(outcomes)
    }

    /// Simulate a colleague pushing to the scenario's bare remote.
    ///
    /// Requires a previous `run` to have created the remote. Only appends
    /// one commit; existing remote history is never rewritten.
    pub fn update(&self, scenario: &Scenario) -> Result<Report> {
        let update = self.update_procedure(scenario)?;
        let remote = resolve(&self.root, &update.remote);

        let scripter = HistoryScripter::new(self.tool);
        let scratch = ScratchDir::claim(resolve(&self.root, &update.scratch))?;
        let (release, pushed) = self.push_update(&scripter, update)?;
        drop(scratch);

        info!("Pushed update {} to {}", release, remote.display());
        Ok(Report {
            title: "Remote update simulated".to_string(),
            created_paths: Vec::new(),
            current_branch: None,
            branches: Vec::new(),
            tags: Vec::new(),
            highlights: vec![
                format!("📡 New commit on {}: \"{}\"", update.branch, pushed),
                "Your local clone does not know about it yet...".to_string(),
            ],
            instructions: update.instructions.clone(),
        })
    }

    /// Renders the update procedure without running it. Fails like
    /// [`ScenarioRunner::update`] when it could not run.
    pub fn plan_update(&self, scenario: &Scenario) -> Result<String> {
        Ok(self.update_procedure(scenario)?.summary())
    }

    fn update_procedure<'s>(&self, scenario: &'s Scenario) -> Result<&'s RemoteUpdate> {
        let update = scenario
            .remote_update
            .as_ref()
            .ok_or_else(|| ProvisionError::UnsupportedUpdate {
                scenario: scenario.id.to_string(),
            })?;
        scenario.validate()?;

        let remote = resolve(&self.root, &update.remote);
        if workspace_guard::inspect(&remote) == WorkspaceState::Absent {
            return Err(ProvisionError::PreconditionMissing {
                path: remote,
                hint: format!(
                    "run `git-trainer setup {}` without --update first",
                    scenario.id
                ),
            });
        }
        Ok(update)
    }

    fn push_update(
        &self,
        scripter: &HistoryScripter<'_>,
        update: &RemoteUpdate,
    ) -> Result<(u32, String)> {
        let step = |op: GitOp, cwd: &Path| HistoryStep {
            op,
            cwd: cwd.to_path_buf(),
            allow_failure: false,
        };

        scripter.apply_step(
            0,
            &step(
                GitOp::clone_repo(update.remote.clone(), update.scratch.clone()),
                Path::new("."),
            ),
            &self.root,
        )?;

        let clone_dir = resolve(&self.root, &update.scratch);
        let count_raw = scripter.query(
            &clone_dir,
            &GitOp::RevListCount {
                rev: update.branch.clone(),
            },
        )?;
        let count: u32 = count_raw.parse().map_err(|_| {
            ProvisionError::verification(
                "rev-list --count",
                format!("unexpected output `{}`", count_raw),
            )
        })?;

        let file = FileEntry::new(update.file.clone(), (update.render)(count));
        materialize(&clone_dir, &[file])?;

        let message = (update.message)(count);
        let file_arg = update.file.to_string_lossy().into_owned();
        let steps = [
            step(GitOp::add(&[file_arg.as_str()]), update.scratch.as_path()),
            step(GitOp::commit(&message), update.scratch.as_path()),
            step(GitOp::push_to("origin", &update.branch), update.scratch.as_path()),
        ];
        for (i, s) in steps.iter().enumerate() {
            scripter.apply_step(i + 1, s, &self.root)?;
        }
        Ok((count, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Expectation, ScenarioBuilder};
    use crate::types::ScenarioId;
    use crate::vcs::{RecordingTool, ToolOutput};
    use tempfile::TempDir;

    fn conflict_scenario() -> Scenario {
        ScenarioBuilder::new(ScenarioId::ConflictSimple, "Simple conflict", "ex08")
            .write([FileEntry::new("message.txt", "base\n")])
            .git(GitOp::init("main"))
            .git(GitOp::add_all())
            .git(GitOp::commit("base"))
            .git_expect_failure(GitOp::merge("other"))
            .expect(Expectation::CurrentBranch {
                repo: "ex08".into(),
                branch: "main".into(),
            })
            .build()
    }

    fn main_branch_tool() -> RecordingTool {
        RecordingTool::new().respond_with(|op| match op {
            GitOp::CurrentBranch => Some(ToolOutput::ok("main\n")),
            _ => None,
        })
    }

    #[test]
    fn test_run_writes_files_and_records_steps() {
        let tmp = TempDir::new().unwrap();
        let tool = main_branch_tool();
        let runner = ScenarioRunner::new(&tool, tmp.path());
        let outcome = runner.run_detailed(&conflict_scenario(), false).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("ex08/message.txt")).unwrap(),
            "base\n"
        );
        assert_eq!(outcome.steps.len(), 4);
        assert_eq!(outcome.report.current_branch.as_deref(), Some("main"));
        assert_eq!(tool.ops()[0], GitOp::init("main"));
        // the last call is the post-provision branch check
        assert_eq!(tool.ops().last(), Some(&GitOp::CurrentBranch));
    }

    #[test]
    fn test_existing_target_without_force_runs_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("ex08")).unwrap();
        let tool = RecordingTool::new();
        let err = ScenarioRunner::new(&tool, tmp.path())
            .run(&conflict_scenario(), false)
            .unwrap_err();
        assert!(matches!(err, ProvisionError::AlreadyExists { .. }));
        assert!(tool.calls().is_empty());
    }

    #[test]
    fn test_failed_step_then_forced_retry_succeeds() {
        let tmp = TempDir::new().unwrap();
        let failing = RecordingTool::new().failing_at(2);
        let err = ScenarioRunner::new(&failing, tmp.path())
            .run(&conflict_scenario(), false)
            .unwrap_err();
        assert!(matches!(err, ProvisionError::StepFailure { step_index: 2, .. }));
        assert!(tmp.path().join("ex08").exists(), "partial state is kept");

        let tool = main_branch_tool();
        assert!(
            ScenarioRunner::new(&tool, tmp.path())
                .run(&conflict_scenario(), true)
                .is_ok()
        );
    }

    #[test]
    fn test_scratch_directories_are_removed() {
        let tmp = TempDir::new().unwrap();
        let scenario = ScenarioBuilder::new(ScenarioId::Push, "Push", "ex16")
            .auxiliary("remote-ex16.git")
            .scratch_dir("_temp_ex16")
            .in_dir("_temp_ex16")
            .write([FileEntry::new("index.html", "<h1>hi</h1>\n")])
            .git(GitOp::init("main"))
            .in_root()
            .git(GitOp::clone_bare("_temp_ex16", "remote-ex16.git"))
            .build();
        let tool = RecordingTool::new();
        let report = ScenarioRunner::new(&tool, tmp.path())
            .run(&scenario, false)
            .unwrap();

        assert!(!tmp.path().join("_temp_ex16").exists());
        assert_eq!(report.created_paths.len(), 2);
        assert!(tmp.path().join("remote-ex16.git").is_dir());
    }

    fn remote_scenario() -> Scenario {
        ScenarioBuilder::new(ScenarioId::Remote, "Remote", "ex15")
            .auxiliary("remote.git")
            .remote_update(RemoteUpdate {
                remote: "remote.git".into(),
                scratch: "_temp_push".into(),
                branch: "main".into(),
                file: "README.md".into(),
                render: |n| format!("release 1.{}\n", n),
                message: |n| format!("Release 1.{}", n),
                instructions: vec!["git fetch".into()],
            })
            .build()
    }

    #[test]
    fn test_update_requires_remote() {
        let tmp = TempDir::new().unwrap();
        let tool = RecordingTool::new();
        let err = ScenarioRunner::new(&tool, tmp.path())
            .update(&remote_scenario())
            .unwrap_err();
        assert!(matches!(err, ProvisionError::PreconditionMissing { .. }));
        assert!(tool.calls().is_empty());
    }

    #[test]
    fn test_update_unsupported_without_procedure() {
        let tmp = TempDir::new().unwrap();
        let tool = RecordingTool::new();
        let err = ScenarioRunner::new(&tool, tmp.path())
            .update(&conflict_scenario())
            .unwrap_err();
        assert!(matches!(err, ProvisionError::UnsupportedUpdate { .. }));
    }

    #[test]
    fn test_plan_update_checks_remote_and_runs_nothing() {
        let tmp = TempDir::new().unwrap();
        let tool = RecordingTool::new();
        let runner = ScenarioRunner::new(&tool, tmp.path());
        assert!(matches!(
            runner.plan_update(&remote_scenario()).unwrap_err(),
            ProvisionError::PreconditionMissing { .. }
        ));
        assert!(matches!(
            runner.plan_update(&conflict_scenario()).unwrap_err(),
            ProvisionError::UnsupportedUpdate { .. }
        ));

        std::fs::create_dir(tmp.path().join("remote.git")).unwrap();
        let plan = runner.plan_update(&remote_scenario()).unwrap();
        assert!(plan.starts_with("Remote update: remote.git (main)"));
        assert!(plan.contains("[_temp_push] git push origin main"));
        assert!(plan.contains("remove scratch _temp_push"));
        assert!(tool.calls().is_empty());
        assert!(!tmp.path().join("_temp_push").exists());
    }

    #[test]
    fn test_update_pushes_rendered_release() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("remote.git")).unwrap();
        let tool = RecordingTool::new().respond_with(|op| match op {
            GitOp::RevListCount { .. } => Some(ToolOutput::ok("3\n")),
            _ => None,
        });
        let report = ScenarioRunner::new(&tool, tmp.path())
            .update(&remote_scenario())
            .unwrap();

        let ops = tool.ops();
        assert!(matches!(ops[0], GitOp::Clone { .. }));
        assert_eq!(ops[2], GitOp::add(&["README.md"]));
        assert_eq!(ops[3], GitOp::commit("Release 1.3"));
        assert_eq!(ops[4], GitOp::push_to("origin", "main"));
        assert!(report.highlights[0].contains("Release 1.3"));
        assert!(!tmp.path().join("_temp_push").exists());
    }
}
