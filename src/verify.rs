//! Post-provision checks
//!
//! A provisioned exercise must be self-consistent: if the instructions talk
//! about a conflict in `page.html`, the index really has unmerged entries for
//! it and the file really holds the documented number of conflict blocks.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ProvisionError, Result};
use crate::history::HistoryScripter;
use crate::scenario::{resolve, Expectation};
use crate::vcs::GitOp;

/// Count complete `<<<<<<<` ... `>>>>>>>` blocks in `text`.
///
/// A block only counts once its closing marker is seen; an opening marker
/// inside an open block is ignored.
pub fn count_conflict_blocks(text: &str) -> usize {
    let mut open = false;
    let mut blocks = 0;
    for line in text.lines() {
        if is_marker(line, '<') {
            open = true;
        } else if is_marker(line, '>') && open {
            open = false;
            blocks += 1;
        }
    }
    blocks
}

fn is_marker(line: &str, c: char) -> bool {
    let marker: String = std::iter::repeat(c).take(7).collect();
    match line.strip_prefix(marker.as_str()) {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

/// Paths listed by `git ls-files -u`, deduplicated (one line per stage).
pub fn unmerged_paths(ls_files_output: &str) -> Vec<String> {
    let mut paths: Vec<String> = ls_files_output
        .lines()
        .filter_map(|line| line.split_once('\t').map(|(_, path)| path.to_string()))
        .collect();
    paths.dedup();
    paths
}

/// Check every expectation, stopping at the first mismatch.
pub fn check_all(
    scripter: &HistoryScripter<'_>,
    root: &Path,
    expectations: &[Expectation],
) -> Result<()> {
    for expectation in expectations {
        check(scripter, root, expectation)?;
        debug!("Check passed: {}", expectation);
    }
    Ok(())
}

/// Check a single expectation.
pub fn check(scripter: &HistoryScripter<'_>, root: &Path, expectation: &Expectation) -> Result<()> {
    match expectation {
        Expectation::ConflictMarkers { repo, path, blocks } => {
            let repo_dir = resolve(root, repo);
            let listing = scripter.query_raw(&repo_dir, &GitOp::ListUnmerged)?;
            let wanted = path.to_string_lossy().replace('\\', "/");
            if !unmerged_paths(&listing).iter().any(|p| *p == wanted) {
                return Err(ProvisionError::verification(
                    expectation.to_string(),
                    format!("{} is not unmerged in the index", wanted),
                ));
            }
            let file = repo_dir.join(path);
            let text = fs::read_to_string(&file)
                .map_err(|e| ProvisionError::io(format!("reading {}", file.display()), e))?;
            let found = count_conflict_blocks(&text);
            if found != *blocks {
                return Err(ProvisionError::verification(
                    expectation.to_string(),
                    format!("found {} conflict block(s), expected {}", found, blocks),
                ));
            }
        }
        Expectation::CurrentBranch { repo, branch } => {
            let current = scripter.query(&resolve(root, repo), &GitOp::CurrentBranch)?;
            if current != *branch {
                return Err(ProvisionError::verification(
                    expectation.to_string(),
                    format!("repository is on `{}`", current),
                ));
            }
        }
        Expectation::FastForward { repo, base, tip } => {
            let repo_dir = resolve(root, repo);
            let base_tip = scripter.query(&repo_dir, &GitOp::RevParse { rev: base.clone() })?;
            let tip_id = scripter.query(&repo_dir, &GitOp::RevParse { rev: tip.clone() })?;
            let merge_base = scripter.query(
                &repo_dir,
                &GitOp::MergeBase {
                    a: base.clone(),
                    b: tip.clone(),
                },
            )?;
            if merge_base != base_tip {
                return Err(ProvisionError::verification(
                    expectation.to_string(),
                    format!("{} has commits since diverging from {}", base, tip),
                ));
            }
            if tip_id == base_tip {
                return Err(ProvisionError::verification(
                    expectation.to_string(),
                    format!("{} has no commits ahead of {}", tip, base),
                ));
            }
        }
        Expectation::Tag { repo, name } => {
            scripter
                .query(
                    &resolve(root, repo),
                    &GitOp::RevParse {
                        rev: format!("refs/tags/{}", name),
                    },
                )
                .map_err(|_| {
                    ProvisionError::verification(
                        expectation.to_string(),
                        format!("tag {} does not exist", name),
                    )
                })?;
        }
    }
    Ok(())
}
