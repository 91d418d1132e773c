//! The twenty training exercises.
//!
//! Every exercise is pure data built with [`ScenarioBuilder`]; nothing here
//! touches the filesystem. Exercises are grouped by topic:
//!
//! - [`basics`]: first repository, `.gitignore`, diff, restore
//! - [`branching`]: branches, merges, conflicts
//! - [`rewriting`]: stash, revert, reset, rebase
//! - [`remotes`]: bare remote, push, pull conflict
//! - [`inspection`]: tags, cherry-pick, bisect
//!
//! [`ScenarioBuilder`]: crate::scenario::ScenarioBuilder

mod basics;
mod branching;
mod inspection;
mod remotes;
mod rewriting;

use crate::scenario::Scenario;
use crate::types::ScenarioId;

/// Initial branch of every scripted repository.
pub const MAIN: &str = "main";

/// The recipe for `id`.
pub fn scenario(id: ScenarioId) -> Scenario {
    match id {
        ScenarioId::Init => basics::init(),
        ScenarioId::Gitignore => basics::gitignore(),
        ScenarioId::Diff => basics::diff(),
        ScenarioId::Restore => basics::restore(),
        ScenarioId::Branch => branching::branch(),
        ScenarioId::MergeFf => branching::merge_ff(),
        ScenarioId::MergeNoff => branching::merge_noff(),
        ScenarioId::ConflictSimple => branching::conflict_simple(),
        ScenarioId::ConflictComplex => branching::conflict_complex(),
        ScenarioId::Stash => rewriting::stash(),
        ScenarioId::Revert => rewriting::revert(),
        ScenarioId::Reset => rewriting::reset(),
        ScenarioId::Rebase => rewriting::rebase(),
        ScenarioId::RebaseInteractive => rewriting::rebase_interactive(),
        ScenarioId::Remote => remotes::remote(),
        ScenarioId::Push => remotes::push(),
        ScenarioId::PullConflict => remotes::pull_conflict(),
        ScenarioId::Tags => inspection::tags(),
        ScenarioId::CherryPick => inspection::cherry_pick(),
        ScenarioId::Bisect => inspection::bisect(),
    }
}

/// Every exercise, in course order.
pub fn all() -> Vec<Scenario> {
    ScenarioId::all().into_iter().map(scenario).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Action, Expectation};
    use crate::vcs::GitOp;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn test_every_scenario_validates() {
        for scenario in all() {
            scenario
                .validate()
                .unwrap_or_else(|e| panic!("{}: {}", scenario.id, e));
        }
    }

    #[test]
    fn test_ids_and_targets_line_up() {
        for scenario in all() {
            let prefix = format!("ex{:02}-", scenario.id.number());
            let target = scenario.target.to_string_lossy().into_owned();
            assert!(target.starts_with(&prefix), "{} -> {}", scenario.id, target);
        }
    }

    #[test]
    fn test_guarded_directories_are_disjoint() {
        let mut seen = HashSet::new();
        for scenario in all() {
            for dir in scenario.guarded_dirs() {
                assert!(seen.insert(dir.clone()), "{} guarded twice", dir.display());
            }
        }
    }

    #[test]
    fn test_only_conflict_scenarios_tolerate_failure() {
        for scenario in all() {
            let tolerated = scenario.steps().filter(|s| s.allow_failure).count();
            let expected = matches!(
                scenario.id,
                ScenarioId::ConflictSimple | ScenarioId::ConflictComplex
            );
            assert_eq!(tolerated == 1, expected, "{}", scenario.id);
        }
    }

    #[test]
    fn test_conflict_block_counts() {
        let blocks = |id| {
            scenario(id)
                .expectations
                .iter()
                .find_map(|e| match e {
                    Expectation::ConflictMarkers { blocks, .. } => Some(*blocks),
                    _ => None,
                })
        };
        assert_eq!(blocks(ScenarioId::ConflictSimple), Some(1));
        assert_eq!(blocks(ScenarioId::ConflictComplex), Some(2));
    }

    #[test]
    fn test_first_two_exercises_have_no_history() {
        assert!(!scenario(ScenarioId::Init).has_history());
        assert!(!scenario(ScenarioId::Gitignore).has_history());
        assert!(scenario(ScenarioId::Diff).has_history());
    }

    #[test]
    fn test_only_remote_supports_update() {
        for scenario in all() {
            assert_eq!(
                scenario.remote_update.is_some(),
                scenario.id == ScenarioId::Remote,
                "{}",
                scenario.id
            );
        }
    }

    #[test]
    fn test_scratch_dirs_are_claimed_and_dropped() {
        for scenario in all() {
            let mut open: Vec<PathBuf> = Vec::new();
            for action in &scenario.actions {
                match action {
                    Action::Scratch { path, .. } => open.push(path.clone()),
                    Action::DropScratch { path } => open.retain(|p| p != path),
                    _ => {}
                }
            }
            assert!(open.is_empty(), "{} leaves {:?}", scenario.id, open);
        }
    }

    #[test]
    fn test_repositories_start_on_main() {
        for scenario in all() {
            for step in scenario.steps() {
                if let GitOp::Init { initial_branch } = &step.op {
                    assert_eq!(initial_branch, MAIN, "{}", scenario.id);
                }
            }
        }
    }

    #[test]
    fn test_rebase_interactive_has_five_messy_commits() {
        let messages: Vec<String> = scenario(ScenarioId::RebaseInteractive)
            .steps()
            .filter_map(|s| match &s.op {
                GitOp::Commit { message } => Some(message.clone()),
                _ => None,
            })
            .skip(1)
            .collect();
        assert_eq!(messages, vec!["wip", "wip2", "fix typo", "wip", "done"]);
    }

    #[test]
    fn test_bisect_ships_executable_script() {
        let scenario = scenario(ScenarioId::Bisect);
        let executable = scenario.actions.iter().any(|a| match a {
            Action::Write { files, .. } => files
                .iter()
                .any(|f| f.executable && f.path == PathBuf::from("test.sh")),
            _ => false,
        });
        assert!(executable);
    }

    #[test]
    fn test_reported_final_branches() {
        let branch = |id| scenario(id).final_branch();
        assert_eq!(branch(ScenarioId::ConflictSimple).as_deref(), Some("version-client"));
        assert_eq!(branch(ScenarioId::CherryPick).as_deref(), Some("release"));
        assert_eq!(branch(ScenarioId::Rebase).as_deref(), Some("feature-content"));
        assert_eq!(branch(ScenarioId::Init), None);
    }
}
