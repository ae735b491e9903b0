use std::fmt;
use std::path::PathBuf;

use crate::tool::{ExitStatus, ProcessResult};

/// Failure of a build or test tool invocation.
///
/// `NonZeroExit` is the only shape that counts as the tool "failing
/// normally"; every other variant means the tool could not be run as
/// intended.
#[derive(Debug)]
pub enum ToolError {
    ToolNotFound {
        program: String,
        source: which::Error,
    },
    InvalidPackage {
        path: PathBuf,
        message: String,
    },
    Spawn {
        command: String,
        source: std::io::Error,
    },
    NonZeroExit(Box<ProcessResult>),
    Other(anyhow::Error),
}

impl ToolError {
    pub fn tool_not_found(program: impl Into<String>, source: which::Error) -> Self {
        Self::ToolNotFound {
            program: program.into(),
            source,
        }
    }

    pub fn invalid_package(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidPackage {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    pub fn non_zero_exit(result: ProcessResult) -> Self {
        Self::NonZeroExit(Box::new(result))
    }

    /// Exit status of the tool process, when it ran to completion
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match self {
            Self::NonZeroExit(result) => Some(result.exit_status),
            _ => None,
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolNotFound { program, source } => {
                write!(f, "Build tool '{program}' not found in PATH: {source}")
            }
            Self::InvalidPackage { path, message } => {
                write!(f, "Invalid package at {}: {message}", path.display())
            }
            Self::Spawn { command, source } => {
                write!(f, "Failed to execute `{command}`: {source}")
            }
            Self::NonZeroExit(result) => write!(f, "{result}"),
            Self::Other(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ToolNotFound { source, .. } => Some(source),
            Self::Spawn { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        Self::Spawn {
            command: "unknown".to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for ToolError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
