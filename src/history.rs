//! Sequential execution of scenario tool steps
//!
//! Steps run strictly one after another: every step depends on the
//! repository state the previous one left behind. Each step carries its own
//! working directory, so one script can build a seed repository, clone it
//! bare and clone it again for the learner.
//!
//! # Failure policy
//!
//! - A non-zero exit aborts with `StepFailure`, carrying the captured stderr.
//! - A step marked `allow_failure` continues past a non-zero exit. Why the
//!   tool failed is not inspected; post-provision checks confirm the result.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::scenario::{resolve, HistoryStep};
use crate::vcs::{GitOp, ToolOutput, VcsTool};

/// What happened when a step ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Zero-based position among the tool steps of the script.
    pub index: usize,
    /// The operation that ran.
    pub op: GitOp,
    /// Exit status and captured output.
    pub output: ToolOutput,
    /// True when the step failed and the failure was tolerated.
    pub tolerated: bool,
}

/// Runs [`HistoryStep`]s against a [`VcsTool`].
pub struct HistoryScripter<'a> {
    tool: &'a dyn VcsTool,
}

impl<'a> HistoryScripter<'a> {
    pub fn new(tool: &'a dyn VcsTool) -> Self {
        Self { tool }
    }

    /// Run every step in order, stopping at the first unexpected failure.
    pub fn apply(&self, steps: &[HistoryStep], root: &Path) -> Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            outcomes.push(self.apply_step(index, step, root)?);
        }
        Ok(outcomes)
    }

    /// Run one step. `index` is only used for reporting.
    pub fn apply_step(&self, index: usize, step: &HistoryStep, root: &Path) -> Result<StepOutcome> {
        let cwd = resolve(root, &step.cwd);
        let op = step.op.rooted(root);
        debug!("Step {}: {}", index + 1, step);

        let output = self.tool.run(&cwd, &op)?;
        let tolerated = !output.success && step.allow_failure;
        if tolerated {
            warn!(
                "Step {} ({}) exited with {:?}; failure tolerated",
                index + 1,
                op,
                output.exit_code
            );
        } else {
            output.ensure_success(index, &op)?;
        }

        Ok(StepOutcome {
            index,
            op,
            output,
            tolerated,
        })
    }

    /// Run a read-only query and return its first output line.
    pub fn query(&self, repo: &Path, op: &GitOp) -> Result<String> {
        let output = self.tool.run(repo, op)?;
        output.ensure_success(0, op)?;
        let value = output.value().to_string();
        info!("{} -> {}", op, value);
        Ok(value)
    }

    /// Run a read-only query and return all of stdout.
    pub fn query_raw(&self, repo: &Path, op: &GitOp) -> Result<String> {
        let output = self.tool.run(repo, op)?;
        output.ensure_success(0, op)?;
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvisionError;
    use crate::vcs::RecordingTool;
    use std::path::PathBuf;

    fn step(op: GitOp, cwd: &str, allow_failure: bool) -> HistoryStep {
        HistoryStep {
            op,
            cwd: PathBuf::from(cwd),
            allow_failure,
        }
    }

    #[test]
    fn test_steps_run_in_order_with_their_own_cwd() {
        let tool = RecordingTool::new();
        let steps = vec![
            step(GitOp::init("main"), "_temp_init", false),
            step(GitOp::clone_bare("_temp_init", "remote.git"), ".", false),
            step(GitOp::clone_repo("remote.git", "ex15"), ".", false),
        ];
        let outcomes = HistoryScripter::new(&tool)
            .apply(&steps, Path::new("/work"))
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        let calls = tool.calls();
        assert_eq!(calls[0].cwd, PathBuf::from("/work/_temp_init"));
        assert_eq!(calls[1].cwd, PathBuf::from("/work"));
        assert_eq!(
            calls[2].op,
            GitOp::clone_repo("/work/remote.git", "/work/ex15")
        );
    }

    #[test]
    fn test_unexpected_failure_aborts_with_index() {
        let tool = RecordingTool::new().failing_at(1);
        let steps = vec![
            step(GitOp::init("main"), "ex03", false),
            step(GitOp::add_all(), "ex03", false),
            step(GitOp::commit("never runs"), "ex03", false),
        ];
        let err = HistoryScripter::new(&tool)
            .apply(&steps, Path::new("/work"))
            .unwrap_err();

        match err {
            ProvisionError::StepFailure {
                step_index, stderr, ..
            } => {
                assert_eq!(step_index, 1);
                assert!(stderr.contains("simulated failure"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(tool.calls().len(), 2, "no step may run after a failure");
    }

    #[test]
    fn test_tolerated_failure_continues() {
        let tool = RecordingTool::new().failing_at(0);
        let steps = vec![
            step(GitOp::merge("version-interne"), "ex08", true),
            step(GitOp::CurrentBranch, "ex08", false),
        ];
        let outcomes = HistoryScripter::new(&tool)
            .apply(&steps, Path::new("/work"))
            .unwrap();
        assert!(outcomes[0].tolerated);
        assert!(!outcomes[1].tolerated);
        assert!(outcomes[1].output.success);
    }

    #[test]
    fn test_query_returns_first_line() {
        let tool = RecordingTool::new().respond_with(|op| match op {
            GitOp::RevParse { .. } => Some(ToolOutput::ok("abc123\nextra\n")),
            _ => None,
        });
        let value = HistoryScripter::new(&tool)
            .query(Path::new("/work/ex06"), &GitOp::RevParse { rev: "main".into() })
            .unwrap();
        assert_eq!(value, "abc123");
    }
}
