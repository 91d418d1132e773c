//! Type-safe scenario identifiers
//!
//! Every exercise of the course is a variant here, so the CLI parser, the
//! catalog lookup and the listing all share one exhaustive enum instead of
//! stringly-typed names.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// One exercise of the course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ScenarioId {
    Init,
    Gitignore,
    Diff,
    Restore,
    Branch,
    MergeFf,
    MergeNoff,
    ConflictSimple,
    ConflictComplex,
    Stash,
    Revert,
    Reset,
    Rebase,
    RebaseInteractive,
    Remote,
    Push,
    PullConflict,
    Tags,
    CherryPick,
    Bisect,
}

impl ScenarioId {
    /// Position of the exercise in the course, starting at 1.
    pub fn number(&self) -> u8 {
        match self {
            Self::Init => 1,
            Self::Gitignore => 2,
            Self::Diff => 3,
            Self::Restore => 4,
            Self::Branch => 5,
            Self::MergeFf => 6,
            Self::MergeNoff => 7,
            Self::ConflictSimple => 8,
            Self::ConflictComplex => 9,
            Self::Stash => 10,
            Self::Revert => 11,
            Self::Reset => 12,
            Self::Rebase => 13,
            Self::RebaseInteractive => 14,
            Self::Remote => 15,
            Self::Push => 16,
            Self::PullConflict => 17,
            Self::Tags => 18,
            Self::CherryPick => 19,
            Self::Bisect => 20,
        }
    }

    /// All exercises in course order.
    pub fn all() -> Vec<ScenarioId> {
        let mut ids: Vec<ScenarioId> = Self::iter().collect();
        ids.sort_by_key(|id| id.number());
        ids
    }

    /// Look an exercise up by its course number.
    pub fn from_number(number: u8) -> Option<ScenarioId> {
        Self::iter().find(|id| id.number() == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kebab_case_names() {
        assert_eq!(ScenarioId::MergeFf.to_string(), "merge-ff");
        assert_eq!(ScenarioId::RebaseInteractive.to_string(), "rebase-interactive");
        assert_eq!(
            ScenarioId::from_str("pull-conflict").ok(),
            Some(ScenarioId::PullConflict)
        );
        assert!(ScenarioId::from_str("merge_ff").is_err());
    }

    #[test]
    fn test_numbers_are_unique_and_contiguous() {
        let numbers: Vec<u8> = ScenarioId::all().iter().map(|id| id.number()).collect();
        assert_eq!(numbers, (1..=20).collect::<Vec<u8>>());
    }

    #[test]
    fn test_from_number() {
        assert_eq!(ScenarioId::from_number(9), Some(ScenarioId::ConflictComplex));
        assert_eq!(ScenarioId::from_number(0), None);
        assert_eq!(ScenarioId::from_number(21), None);
    }
}
