//! Configuration file handling for the trainer.
//!
//! Everything has a default, so a missing `--config` simply means
//! [`TrainerConfig::default`]. The file is plain JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::vcs::Identity;

/// Environment variable that overrides [`TrainerConfig::git_binary`].
pub const GIT_BINARY_ENV: &str = "GIT_TRAINER_GIT";

/// Trainer configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Program used for every tool step.
    pub git_binary: String,
    /// Author and committer recorded on scripted commits.
    pub author_name: String,
    pub author_email: String,
    /// Directory under which exercises are created; the current directory
    /// when unset.
    pub workspace_root: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            author_name: "Git Trainer".to_string(),
            author_email: "trainer@example.com".to_string(),
            workspace_root: None,
        }
    }
}

impl TrainerConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load `path` if given, defaults otherwise, then apply the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::var(GIT_BINARY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply a `GIT_TRAINER_GIT` value; empty values are ignored.
    pub fn apply_env(&mut self, git_binary: Option<String>) {
        if let Some(binary) = git_binary.filter(|b| !b.trim().is_empty()) {
            self.git_binary = binary;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.git_binary.trim().is_empty() {
            anyhow::bail!("git_binary must be specified");
        }
        if self.author_name.trim().is_empty() {
            anyhow::bail!("author_name must be specified");
        }
        if !self.author_email.contains('@') {
            anyhow::bail!(
                "author_email must be an e-mail address, got {:?}",
                self.author_email
            );
        }
        Ok(())
    }

    /// Root for exercise directories: `flag` wins over the file, which wins
    /// over the current directory. Always absolute, since clone steps run
    /// from the root and pass paths below it.
    pub fn workspace_root(&self, flag: Option<&Path>) -> Result<PathBuf> {
        match flag.or(self.workspace_root.as_deref()) {
            Some(root) => std::path::absolute(root)
                .with_context(|| format!("Failed to resolve workspace root {:?}", root)),
            None => std::env::current_dir().context("Failed to determine the current directory"),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            name: self.author_name.clone(),
            email: self.author_email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_trainer_config_default() {
        let config = TrainerConfig::default();
        assert_eq!(config.git_binary, "git");
        assert!(config.workspace_root.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(br#"{ "author_name": "Ada", "workspace_root": "/srv/course" }"#)
            .unwrap();
        temp_file.flush().unwrap();

        let loaded = TrainerConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.author_name, "Ada");
        assert_eq!(loaded.git_binary, "git");
        assert_eq!(loaded.workspace_root, Some(PathBuf::from("/srv/course")));
    }

    #[test]
    fn test_roundtrip_save_load() {
        let config = TrainerConfig {
            git_binary: "/usr/local/bin/git".to_string(),
            workspace_root: Some(PathBuf::from("/tmp/course")),
            ..Default::default()
        };
        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();
        assert_eq!(TrainerConfig::load_from_file(temp_file.path()).unwrap(), config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = TrainerConfig::load_from_file(Path::new("/nonexistent/path"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ invalid json }").unwrap();
        temp_file.flush().unwrap();

        let result = TrainerConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_json_wrong_type_fails() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(br#"{ "git_binary": 42 }"#).unwrap();
        temp_file.flush().unwrap();

        assert!(TrainerConfig::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_identity() {
        let config = TrainerConfig {
            author_email: "nobody".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TrainerConfig {
            author_name: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override() {
        let mut config = TrainerConfig::default();
        config.apply_env(Some(String::new()));
        assert_eq!(config.git_binary, "git");
        config.apply_env(Some("/opt/git/bin/git".to_string()));
        assert_eq!(config.git_binary, "/opt/git/bin/git");
    }

    #[test]
    fn test_workspace_root_precedence() {
        let config = TrainerConfig {
            workspace_root: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            config.workspace_root(Some(Path::new("/from/flag"))).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            config.workspace_root(None).unwrap(),
            PathBuf::from("/from/config")
        );
        assert_eq!(
            TrainerConfig::default().workspace_root(None).unwrap(),
            std::env::current_dir().unwrap()
        );
        assert!(
            TrainerConfig::default()
                .workspace_root(Some(Path::new("course")))
                .unwrap()
                .is_absolute()
        );
    }
}
