//! Error handling module for git-trainer
//!
//! Provides the single error type surfaced by the provisioning engine.
//! Every variant renders as a human-readable diagnostic that tells the
//! learner how to fix the situation and retry.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for scenario provisioning
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// A guarded directory already exists and `--force` was not given.
    /// Nothing on disk has been touched.
    #[error(
        "directory {} already exists; rerun with --force to recreate it (this deletes its contents)",
        path.display()
    )]
    AlreadyExists { path: PathBuf },

    /// The version-control tool exited non-zero on a step that was not
    /// marked as allowed to fail.
    #[error(
        "step {} failed ({}), exit code {}:\n{}",
        step_index + 1,
        step,
        exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()),
        stderr.trim()
    )]
    StepFailure {
        /// Zero-based index of the tool step within the script.
        step_index: usize,
        /// Rendered form of the step that failed.
        step: String,
        /// Exit code, `None` if the process was killed by a signal.
        exit_code: Option<i32>,
        /// Captured standard error of the tool.
        stderr: String,
    },

    /// A procedure needs state that a previous provisioning run creates.
    #[error("{} does not exist; {hint}", path.display())]
    PreconditionMissing { path: PathBuf, hint: String },

    /// A scenario path escapes its directory or is otherwise unusable.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// The tool binary could not be started at all.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The provisioned repository does not match what the scenario promises.
    #[error("verification `{check}` failed: {detail}")]
    Verification { check: String, detail: String },

    /// `--update` was requested for a scenario without a remote-update procedure.
    #[error("scenario `{scenario}` has no remote update procedure; --update is only valid for remote scenarios")]
    UnsupportedUpdate { scenario: String },

    /// Filesystem errors, with what was being attempted.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a verification error
    pub fn verification(check: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Verification {
            check: check.into(),
            detail: detail.into(),
        }
    }

    /// True when the failure left the filesystem untouched.
    pub fn is_precheck_failure(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists { .. }
                | Self::PreconditionMissing { .. }
                | Self::UnsupportedUpdate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_mentions_force() {
        let err = ProvisionError::AlreadyExists {
            path: PathBuf::from("ex01-init"),
        };
        let msg = err.to_string();
        assert!(msg.contains("ex01-init"));
        assert!(msg.contains("--force"));
    }

    #[test]
    fn test_step_failure_display_is_one_based() {
        let err = ProvisionError::StepFailure {
            step_index: 2,
            step: "git commit -m x".to_string(),
            exit_code: Some(1),
            stderr: "nothing to commit\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "step 3 failed (git commit -m x), exit code 1:\nnothing to commit"
        );
    }

    #[test]
    fn test_step_failure_without_exit_code() {
        let err = ProvisionError::StepFailure {
            step_index: 0,
            step: "git init -b main".to_string(),
            exit_code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("exit code none"));
    }

    #[test]
    fn test_precheck_classification() {
        assert!(ProvisionError::AlreadyExists { path: "x".into() }.is_precheck_failure());
        assert!(
            ProvisionError::PreconditionMissing {
                path: "remote.git".into(),
                hint: "run setup first".into()
            }
            .is_precheck_failure()
        );
        assert!(!ProvisionError::verification("branch", "wrong").is_precheck_failure());
    }

    #[test]
    fn test_io_constructor_keeps_context() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ProvisionError::io("writing README.md", io_err);
        assert!(matches!(err, ProvisionError::Io { .. }));
        assert!(err.to_string().starts_with("writing README.md"));
    }
}
