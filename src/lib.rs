//! Git Trainer Library
//!
//! Provisions the practice directories of a hands-on git course: each
//! exercise is a [`scenario::Scenario`] from the [`catalog`], applied by a
//! [`runner::ScenarioRunner`] through the [`vcs::VcsTool`] interface.

pub mod catalog;
pub mod cli;
pub mod config_file;
pub mod content;
pub mod error;
pub mod history;
pub mod report;
pub mod runner;
pub mod sanity;
pub mod scenario;
pub mod types;
pub mod vcs;
pub mod verify;
pub mod workspace_guard;

// Re-export main types for convenience
pub use config_file::TrainerConfig;
pub use error::{ProvisionError, Result};
pub use report::Report;
pub use runner::ScenarioRunner;
pub use scenario::{Expectation, Scenario, ScenarioBuilder};
pub use types::ScenarioId;
pub use vcs::{GitCli, GitOp, RecordingTool, VcsTool};
