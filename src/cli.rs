use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::types::ScenarioId;

/// Git Trainer - practice directories for a hands-on git course
#[derive(Parser, Debug)]
#[command(name = "git-trainer")]
#[command(about = "Provisions exercise directories with scripted git history")]
#[command(version)]
pub struct Cli {
    /// Directory under which exercises are created (default: config, then cwd)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log every step to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dry-run mode: print the plan instead of touching the filesystem.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every exercise
    List,
    /// Create an exercise directory
    Setup {
        /// Exercise id (e.g. conflict-simple) or number (e.g. 8)
        #[arg(value_parser = parse_scenario)]
        scenario: ScenarioId,

        /// Delete and recreate the exercise directories if they exist
        #[arg(long)]
        force: bool,

        /// Simulate a colleague pushing to the exercise's remote
        #[arg(long, conflicts_with = "force")]
        update: bool,
    },
    /// Print what `setup` would do
    Plan {
        /// Exercise id or number
        #[arg(value_parser = parse_scenario)]
        scenario: ScenarioId,
    },
    /// Check that git can be run
    Check,
}

/// Accept `conflict-simple`, `8`, `08` or `ex08`.
fn parse_scenario(value: &str) -> Result<ScenarioId, String> {
    if let Ok(id) = ScenarioId::from_str(value) {
        return Ok(id);
    }
    let digits = value.strip_prefix("ex").unwrap_or(value);
    digits
        .parse::<u8>()
        .ok()
        .and_then(ScenarioId::from_number)
        .ok_or_else(|| {
            format!(
                "unknown exercise `{}` (run `git-trainer list` to see them)",
                value
            )
        })
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["git-trainer"]).is_err());
    }

    #[test]
    fn test_cli_setup_with_force() {
        let cli = Cli::try_parse_from(["git-trainer", "setup", "conflict-simple", "--force"])
            .unwrap();
        match cli.command {
            Commands::Setup {
                scenario,
                force,
                update,
            } => {
                assert_eq!(scenario, ScenarioId::ConflictSimple);
                assert!(force);
                assert!(!update);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_scenario_by_number() {
        for arg in ["15", "015", "ex15"] {
            let cli = Cli::try_parse_from(["git-trainer", "setup", arg, "--update"]).unwrap();
            assert!(matches!(
                cli.command,
                Commands::Setup {
                    scenario: ScenarioId::Remote,
                    update: true,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_cli_unknown_scenario() {
        assert!(Cli::try_parse_from(["git-trainer", "setup", "rebase-everything"]).is_err());
        assert!(Cli::try_parse_from(["git-trainer", "setup", "21"]).is_err());
    }

    #[test]
    fn test_cli_force_and_update_conflict() {
        let result = Cli::try_parse_from(["git-trainer", "setup", "remote", "--force", "--update"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "git-trainer",
            "plan",
            "tags",
            "--root",
            "/tmp/course",
            "--dry-run",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/course")));
        assert!(cli.dry_run);
        assert!(cli.verbose);
    }
}
