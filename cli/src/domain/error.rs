//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! `SyncError` is the tagged result of every bundle operation; the binary
//! converts it to `anyhow::Error` at the edge and maps it to an exit code.

use std::path::PathBuf;

use bdapt_common::ValidationError;
use thiserror::Error;

/// Exit code for operations declined or interrupted by the user.
pub const EXIT_ABORTED: i32 = 130;

/// Exit code for every other failure.
pub const EXIT_FAILURE: i32 = 1;

// ── Storage errors ────────────────────────────────────────────────────────────

/// Failures reading, writing, or locking the persisted bundle record.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("another bdapt instance is running (lock held on {})", .path.display())]
    Locked { path: PathBuf },

    #[error("cannot acquire lock {}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Privilege(String),
}

// ── Command errors ────────────────────────────────────────────────────────────

/// Failures invoking an external tool (build tool or package manager).
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{program} not found. {hint}")]
    ToolMissing { program: String, hint: String },

    #[error("`{command}` exited with {status}{}", output_excerpt(.stdout, .stderr))]
    Failed {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("{program} did not produce a .deb file in {}", .dir.display())]
    NoArtifact { program: String, dir: PathBuf },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` interrupted")]
    Interrupted { command: String },
}

impl CommandError {
    #[must_use]
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}

/// Keep error output readable: prefer stderr, fall back to the tail of stdout.
fn output_excerpt(stdout: &str, stderr: &str) -> String {
    let text = if stderr.trim().is_empty() { stdout } else { stderr };
    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let start = lines.len().saturating_sub(20);
    format!(":\n{}", lines[start..].join("\n"))
}

// ── Sync errors ───────────────────────────────────────────────────────────────

/// Why an operation stopped without changing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    Declined,
    Interrupted,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declined => f.write_str("Operation cancelled by user."),
            Self::Interrupted => f.write_str("Operation interrupted."),
        }
    }
}

/// Tagged failure of a bundle operation.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bundle '{0}' does not exist")]
    NotFound(String),

    #[error("Bundle '{0}' already exists")]
    AlreadyExists(String),

    #[error("Package '{package}' is not in bundle '{bundle}'")]
    PackageNotInBundle { bundle: String, package: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Command(CommandError),

    /// The declared definition was already written when the system change failed.
    #[error("{cause}\n\n{remediation}")]
    ApplyFailed {
        cause: CommandError,
        remediation: String,
    },

    #[error("{0}")]
    Aborted(AbortReason),

    #[error("confirmation prompt failed")]
    Prompt(#[source] std::io::Error),
}

impl From<CommandError> for SyncError {
    fn from(err: CommandError) -> Self {
        if err.is_interrupt() {
            Self::Aborted(AbortReason::Interrupted)
        } else {
            Self::Command(err)
        }
    }
}

impl SyncError {
    /// Wrap a failure from the apply phase with recovery guidance.
    #[must_use]
    pub fn apply_failed(cause: CommandError, remediation: String) -> Self {
        Self::ApplyFailed { cause, remediation }
    }

    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Aborted(_) => EXIT_ABORTED,
            Self::ApplyFailed { cause, .. } if cause.is_interrupt() => EXIT_ABORTED,
            _ => EXIT_FAILURE,
        }
    }
}

/// Guidance printed when the system change fails after the definition was saved.
#[must_use]
pub fn sync_remediation(bundle: &str) -> String {
    format!(
        "The bundle definition has been updated, but the system may be in an inconsistent state.\n\
         Run 'bdapt sync {bundle}' to reinstall or 'bdapt del --force {bundle}' to clean up."
    )
}

/// Guidance printed when removing a bundle's metapackage fails.
#[must_use]
pub fn delete_remediation(bundle: &str) -> String {
    format!(
        "The bundle definition was kept because its metapackage could not be removed.\n\
         Run 'bdapt sync {bundle}' to reinstall or 'bdapt del --force {bundle}' to drop the record anyway."
    )
}
