use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Missing dependency: {0}. Please install it.")]
    MissingTool(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("Release host error: {0}")]
    Host(String),

    #[error("Command failed: {command}")]
    Command {
        /// The failing command line, shell-quoted
        command: String,
        /// Exit code of the delegated tool, when it reported one
        code: Option<i32>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        ReleaseError::Branch(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a changelog error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        ReleaseError::Changelog(msg.into())
    }

    /// Create a release host error with context
    pub fn host(msg: impl Into<String>) -> Self {
        ReleaseError::Host(msg.into())
    }

    /// Exit code for the process when this error reaches main.
    ///
    /// External command failures exit with the delegated tool's own code
    /// when it reported one; everything else is a generic failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Command { code: Some(c), .. } => *c,
            _ => 1,
        }
    }
}
