use thiserror::Error;

/// Unified error type for release-tools operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Version format error: {0}")]
    Format(String),

    #[error("No matching version: {0}")]
    NoMatch(String),

    #[error("Unmatched project: {}", .0.join(", "))]
    UnknownProject(Vec<String>),

    #[error("You must select at least one project")]
    NoProjects,

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience type alias for Results in release-tools
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a version format error with context
    pub fn format(msg: impl Into<String>) -> Self {
        ReleaseError::Format(msg.into())
    }

    /// Create a no-match error with context
    pub fn no_match(msg: impl Into<String>) -> Self {
        ReleaseError::NoMatch(msg.into())
    }

    /// Create a command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        ReleaseError::Command(msg.into())
    }

    /// Create a prompt error with context
    pub fn prompt(msg: impl Into<String>) -> Self {
        ReleaseError::Prompt(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }
}
