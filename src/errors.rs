//! Typed error definitions for smartmv.
//! Provides a small set of well-known failure modes for better logs, exit codes and tests.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmartmvError {
    #[error("{0}")]
    InvalidArguments(String),

    #[error("cannot stat {}: No such file or directory", quoted(.0))]
    SourceNotFound(Vec<PathBuf>),

    #[error("destination '{}' already exists (use --force to overwrite)", .0.display())]
    DestinationExists(PathBuf),

    #[error("destination already contains {} (use --force to overwrite)", quoted(.0))]
    DestinationConflict(Vec<PathBuf>),

    #[error("will not move more than one source onto {}", quoted(.0))]
    DuplicateTarget(Vec<PathBuf>),

    #[error("group {group} ({primitive} -> '{}') failed: {message}", .destination.display())]
    ExternalCommandFailure {
        group: usize,
        primitive: &'static str,
        destination: PathBuf,
        message: String,
    },

    #[error("'{}': command not found", .0.display())]
    ToolNotFound(PathBuf),

    #[error("Operation aborted by user")]
    UserAborted,

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SmartmvError {
    /// Process exit code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            SmartmvError::InvalidArguments(_) | SmartmvError::Config(_) => 2,
            SmartmvError::SourceNotFound(_) => 3,
            SmartmvError::DestinationExists(_)
            | SmartmvError::DestinationConflict(_)
            | SmartmvError::DuplicateTarget(_) => 4,
            SmartmvError::ExternalCommandFailure { .. } | SmartmvError::ToolNotFound(_) => 5,
            SmartmvError::UserAborted => 6,
            SmartmvError::Interrupted => 130,
        }
    }

    /// Stable short name used as the `kind` field in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SmartmvError::InvalidArguments(_) => "invalid_arguments",
            SmartmvError::SourceNotFound(_) => "source_not_found",
            SmartmvError::DestinationExists(_) => "destination_exists",
            SmartmvError::DestinationConflict(_) => "destination_conflict",
            SmartmvError::DuplicateTarget(_) => "duplicate_target",
            SmartmvError::ExternalCommandFailure { .. } => "external_command_failure",
            SmartmvError::ToolNotFound(_) => "tool_not_found",
            SmartmvError::UserAborted => "user_aborted",
            SmartmvError::Interrupted => "interrupted",
            SmartmvError::Config(_) => "config",
        }
    }
}

fn quoted(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Exit code for an `anyhow` error coming out of the application layer.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SmartmvError>()
        .map(SmartmvError::code)
        .unwrap_or(1)
}

/// Convenience for building `InvalidArguments` with a path in the message.
pub(crate) fn not_a_directory(dest: &Path) -> SmartmvError {
    SmartmvError::InvalidArguments(format!("target '{}' is not a directory", dest.display()))
}
