use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// File name searched for in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "releasetools.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "RELEASE_TOOLS_CONFIG";

/// Represents the complete configuration for release-tools.
///
/// Holds the releasable projects and the command-line words that select them.
/// Passed explicitly to the project selection functions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_projects")]
    pub projects: Vec<Project>,

    #[serde(default = "default_all_option")]
    pub all_option: String,

    #[serde(default = "default_auto_flag")]
    pub auto_flag: String,
}

/// A releasable sub-project.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub short_name: String,

    /// Names of projects that must be released along with this one.
    #[serde(default)]
    pub requires: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            short_name: short_name.into(),
            requires: Vec::new(),
        }
    }

    pub fn requiring(mut self, names: &[&str]) -> Self {
        self.requires = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

fn default_projects() -> Vec<Project> {
    vec![
        Project::new("langtools", "lt"),
        Project::new("annotation-file-utilities", "afu").requiring(&["langtools"]),
        Project::new("checker-framework", "cf")
            .requiring(&["annotation-file-utilities", "langtools"]),
    ]
}

fn default_all_option() -> String {
    "all".to_string()
}

fn default_auto_flag() -> String {
    "--auto".to_string()
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            projects: default_projects(),
            all_option: default_all_option(),
            auto_flag: default_auto_flag(),
        }
    }
}

impl ReleaseConfig {
    /// Looks up a project by its full name.
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Checks that names are unique and non-empty and that every requirement exists.
    pub fn validate(&self) -> Result<()> {
        if self.all_option.is_empty() {
            return Err(ReleaseError::config("all_option must not be empty"));
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.name.is_empty() || project.short_name.is_empty() {
                return Err(ReleaseError::config(
                    "Project name and short_name must not be empty",
                ));
            }
            for word in [&project.name, &project.short_name] {
                if word == &self.all_option || word == &self.auto_flag {
                    return Err(ReleaseError::config(format!(
                        "Project word '{}' is reserved",
                        word
                    )));
                }
                if !seen.insert(word.as_str()) {
                    return Err(ReleaseError::config(format!(
                        "Duplicate project name or short_name '{}'",
                        word
                    )));
                }
            }
        }

        for project in &self.projects {
            if let Some(missing) = project
                .requires
                .iter()
                .find(|name| self.project(name).is_none())
            {
                return Err(ReleaseError::config(format!(
                    "Project '{}' requires unknown project '{}'",
                    project.name, missing
                )));
            }
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. Path named by the `RELEASE_TOOLS_CONFIG` environment variable
/// 3. `releasetools.toml` in current directory
/// 4. `releasetools.toml` in the user config directory
/// 5. Default configuration if no file found
///
/// The loaded configuration is validated before it is returned.
pub fn load_config(config_path: Option<&str>) -> Result<ReleaseConfig> {
    let config = match locate_config(config_path) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let config_str = fs::read_to_string(&path)?;
            toml::from_str::<ReleaseConfig>(&config_str)?
        }
        None => ReleaseConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

fn locate_config(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
