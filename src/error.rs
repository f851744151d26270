//! Error types for skm.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkmError {
    /// Missing or contradictory user input.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyInstalled(String),

    #[error("{0}")]
    NotInstalled(String),

    /// Registry fetch or decode failure.
    #[error("{0}")]
    Registry(String),

    #[error("{0}")]
    Git(String),

    /// Cloned content is missing something an install requires.
    #[error("{0}")]
    Integrity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// A declared build/install command exited unsuccessfully.
    #[error("{0}")]
    Command(String),

    /// A use case failure that was already rendered to a message.
    #[error("{message}")]
    Operation { code: &'static str, message: String },
}

impl SkmError {
    /// Stable machine-readable code for JSON output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::AlreadyInstalled(_) => "already_installed",
            Self::NotInstalled(_) => "not_installed",
            Self::Registry(_) => "registry",
            Self::Git(_) => "git",
            Self::Integrity(_) => "integrity",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::Command(_) => "command",
            Self::Operation { code, .. } => *code,
        }
    }

    /// Prefix the message with `step`, keeping the error's code. IO errors
    /// become `Operation` so the step leads the rendered message.
    #[must_use]
    pub fn context(self, step: &str) -> Self {
        match self {
            Self::InvalidInput(msg) => Self::InvalidInput(format!("{step}: {msg}")),
            Self::NotFound(msg) => Self::NotFound(format!("{step}: {msg}")),
            Self::AlreadyInstalled(msg) => Self::AlreadyInstalled(format!("{step}: {msg}")),
            Self::NotInstalled(msg) => Self::NotInstalled(format!("{step}: {msg}")),
            Self::Registry(msg) => Self::Registry(format!("{step}: {msg}")),
            Self::Git(msg) => Self::Git(format!("{step}: {msg}")),
            Self::Integrity(msg) => Self::Integrity(format!("{step}: {msg}")),
            Self::Io(err) => Self::Operation {
                code: "io",
                message: format!("{step}: {err}"),
            },
            Self::Serialization(msg) => Self::Serialization(format!("{step}: {msg}")),
            Self::Config(msg) => Self::Config(format!("{step}: {msg}")),
            Self::Command(msg) => Self::Command(format!("{step}: {msg}")),
            Self::Operation { code, message } => Self::Operation {
                code,
                message: format!("{step}: {message}"),
            },
        }
    }
}

impl From<git2::Error> for SkmError {
    fn from(err: git2::Error) -> Self {
        Self::Git(format!("git: {}", err.message()))
    }
}

impl From<serde_json::Error> for SkmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SkmError>;
