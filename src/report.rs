//! Learner-facing summary printed after a successful run.

use std::fmt;
use std::path::PathBuf;

use crate::scenario::Scenario;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    /// Directories created or recreated, absolute.
    pub created_paths: Vec<PathBuf>,
    pub current_branch: Option<String>,
    pub branches: Vec<String>,
    pub tags: Vec<String>,
    pub highlights: Vec<String>,
    pub instructions: Vec<String>,
}

impl Report {
    /// Build the report for a freshly provisioned scenario.
    pub fn for_scenario(scenario: &Scenario, created_paths: Vec<PathBuf>) -> Self {
        Self {
            title: scenario.title.clone(),
            created_paths,
            current_branch: scenario.final_branch(),
            branches: scenario.branches(),
            tags: scenario.tags(),
            highlights: scenario.highlights.clone(),
            instructions: scenario.instructions.clone(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "✅ {}", self.title)?;
        for path in &self.created_paths {
            writeln!(f, "📁 {}", path.display())?;
        }
        if let Some(branch) = &self.current_branch {
            writeln!(f, "🌿 Current branch: {}", branch)?;
        }
        if self.branches.len() > 1 {
            writeln!(f, "🌿 Branches: {}", self.branches.join(", "))?;
        }
        if !self.tags.is_empty() {
            writeln!(f, "🏷️  Tags: {}", self.tags.join(", "))?;
        }
        for line in &self.highlights {
            writeln!(f, "   {}", line)?;
        }
        if !self.instructions.is_empty() {
            writeln!(f)?;
            writeln!(f, "📚 Instructions:")?;
            for (i, line) in self.instructions.iter().enumerate() {
                writeln!(f, "   {}. {}", i + 1, line)?;
            }
        }
        writeln!(f)?;
        write!(f, "💡 Good luck!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_numbers_instructions() {
        let report = Report {
            title: "Exercise ready: tags".into(),
            created_paths: vec![PathBuf::from("/work/ex18-tags")],
            current_branch: Some("main".into()),
            branches: vec!["main".into()],
            tags: vec!["v0.9.0".into()],
            highlights: vec!["Last commit is ready for v1.0.0".into()],
            instructions: vec!["List the tags".into(), "Tag the release".into()],
        };
        let text = report.to_string();
        assert!(text.contains("✅ Exercise ready: tags"));
        assert!(text.contains("📁 /work/ex18-tags"));
        assert!(text.contains("🏷️  Tags: v0.9.0"));
        assert!(text.contains("   2. Tag the release"));
        // a single branch is already shown as the current one
        assert!(!text.contains("Branches:"));
    }
}
