use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-utils operations
#[derive(Error, Debug)]
pub enum GitUtilsError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Command `{command}` failed with exit code {code}:\n{output}")]
    Command {
        command: String,
        code: i32,
        output: String,
    },

    #[error("Failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Invalid remote URL: {0}")]
    RemoteUrl(String),

    #[error("Search pattern '{pattern}' not found in file: {}", .path.display())]
    PatternNotFound { path: PathBuf, pattern: String },

    #[error("Git directory is dirty. Please stage, commit, or stash your changes before running the bump")]
    DirtyWorkingTree,

    #[error("Line in '{}' exceeds the {size}-byte buffer. Increase it with --buffer <size>", .path.display())]
    BufferTooSmall { path: PathBuf, size: usize },

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("Update check failed: {0}")]
    Update(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("INI error: {0}")]
    Ini(#[from] ini::Error),
}

/// Convenience type alias for Results in git-utils
pub type Result<T> = std::result::Result<T, GitUtilsError>;

impl GitUtilsError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitUtilsError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitUtilsError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        GitUtilsError::Tag(msg.into())
    }

    /// Create a remote URL error with context
    pub fn remote_url(msg: impl Into<String>) -> Self {
        GitUtilsError::RemoteUrl(msg.into())
    }

    /// Create an update check error with context
    pub fn update(msg: impl Into<String>) -> Self {
        GitUtilsError::Update(msg.into())
    }
}
