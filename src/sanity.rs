//! Pre-flight sanity checks for the runtime environment
//!
//! Used by `git-trainer check`:
//! - the configured git binary starts and reports a version
//! - the workspace root exists and is a directory

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::vcs::{GitOp, VcsTool};

/// Result of environment verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityCheckResult {
    /// `git --version` output, or `None` when the binary did not run.
    pub git_version: Option<String>,
    /// Why the binary did not run.
    pub git_error: Option<String>,
    pub workspace_root: PathBuf,
    pub root_is_dir: bool,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.git_version.is_some() && self.root_is_dir
    }

    /// Human-readable summary, one line per check.
    pub fn render(&self, binary: &str) -> String {
        let mut lines = Vec::new();
        match (&self.git_version, &self.git_error) {
            (Some(version), _) => lines.push(format!("✅ {} ({})", version, binary)),
            (None, Some(error)) => {
                lines.push(format!("❌ Cannot run `{}`: {}", binary, error));
                lines.push(
                    "   Install git or point GIT_TRAINER_GIT / git_binary at it".to_string(),
                );
            }
            (None, None) => lines.push(format!("❌ `{}` did not report a version", binary)),
        }
        if self.root_is_dir {
            lines.push(format!("✅ Workspace root: {}", self.workspace_root.display()));
        } else {
            lines.push(format!(
                "❌ Workspace root is not a directory: {}",
                self.workspace_root.display()
            ));
        }
        lines.join("\n")
    }
}

/// Perform all sanity checks and return the result
pub fn verify_environment(tool: &dyn VcsTool, workspace_root: &Path) -> SanityCheckResult {
    debug!("Running pre-flight sanity checks...");

    let cwd = workspace_root_or_cwd(workspace_root);
    let (git_version, git_error) = match tool.run(cwd, &GitOp::Version) {
        Ok(output) if output.success && !output.value().is_empty() => {
            (Some(output.value().to_string()), None)
        }
        Ok(output) => (None, Some(output.stderr.trim().to_string())),
        Err(e) => (None, Some(e.to_string())),
    };

    let result = SanityCheckResult {
        git_version,
        git_error,
        workspace_root: workspace_root.to_path_buf(),
        root_is_dir: workspace_root.is_dir(),
    };
    if result.is_ok() {
        info!("Pre-flight checks passed");
    }
    result
}

// a missing root is reported separately; git itself still runs from `.`
fn workspace_root_or_cwd(root: &Path) -> &Path {
    if root.is_dir() { root } else { Path::new(".") }
}
