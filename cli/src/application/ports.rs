//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `bdapt_common`; never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::process::Output;

use bdapt_common::{Bundle, BundleStorage};

use crate::domain::{CommandError, DryRunSummary, StorageError};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Whether `program` resolves to an executable on `PATH`. Never fails.
    fn program_exists(&self, program: &str) -> bool;

    /// Run a program and capture its output.
    ///
    /// A non-zero exit status is not an error at this layer; callers inspect
    /// `Output::status`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ToolMissing` if the program cannot be found,
    /// `CommandError::Interrupted` if the user interrupts the wait (the child
    /// is killed first), or `CommandError::Io` for any other spawn failure.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output, CommandError>;

    /// Like [`CommandRunner::run`], but an interrupt lets the child exit on
    /// its own before `CommandError::Interrupted` is returned. Used for
    /// invocations that must not be cut off mid-transaction.
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run`].
    async fn run_to_exit(&self, program: &str, args: &[&str]) -> Result<Output, CommandError>;

    /// Run a program with `dir` as its working directory.
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run`].
    async fn run_in(&self, dir: &Path, program: &str, args: &[&str])
    -> Result<Output, CommandError>;
}

// ── Bundle Store Port ─────────────────────────────────────────────────────────

/// Durable, lock-protected bundle record.
pub trait BundleStore {
    /// Held for the duration of one load-mutate-save round trip; released on drop.
    type Guard;

    /// Take the exclusive store lock without blocking.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Locked` if another process holds it.
    fn lock(&self) -> Result<Self::Guard, StorageError>;

    /// Current persisted state, or empty storage if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    fn load(&self) -> Result<BundleStorage, StorageError>;

    /// Atomically replace the persisted state.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot complete. The previous record is
    /// left intact in that case.
    fn save(&self, storage: &BundleStorage) -> Result<(), StorageError>;
}

// ── Metapackage Builder Port ──────────────────────────────────────────────────

/// A built metapackage. Dropping it removes its scratch directory.
pub struct Artifact {
    path: PathBuf,
    _scratch: Box<dyn Any>,
}

impl Artifact {
    /// Wrap `path` together with the guard that owns its directory.
    pub fn new(path: PathBuf, scratch: impl Any) -> Self {
        Self {
            path,
            _scratch: Box::new(scratch),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Install target understood by the package system.
    #[must_use]
    pub fn target(&self) -> String {
        self.path.display().to_string()
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact").field("path", &self.path).finish()
    }
}

/// Turns a bundle into an installable metapackage.
#[allow(async_fn_in_trait)]
pub trait MetapackageBuilder {
    /// Render the control manifest for `bundle`.
    fn render(&self, bundle_name: &str, bundle: &Bundle) -> String;

    /// Build the metapackage in a fresh scratch directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the build tool is missing, fails, or produces no
    /// artifact. The scratch directory is removed on every error path.
    async fn build(&self, bundle_name: &str, bundle: &Bundle) -> Result<Artifact, CommandError>;
}

// ── Package System Port ───────────────────────────────────────────────────────

/// The system package manager: preview, apply, and manual-install marks.
///
/// Targets are artifact paths, package names, or removal targets
/// (see [`crate::domain::removal_target`]).
#[allow(async_fn_in_trait)]
pub trait PackageSystem {
    /// Whether a prerequisite tool resolves on `PATH`. Never fails.
    fn tool_exists(&self, program: &str) -> bool;

    /// Preview installing/removing `targets`. `None` means nothing would change.
    ///
    /// # Errors
    ///
    /// Returns an error if the preview invocation fails (e.g. unmet dependencies).
    async fn dry_run(&self, targets: &[String]) -> Result<Option<DryRunSummary>, CommandError>;

    /// Perform the change non-interactively.
    ///
    /// # Errors
    ///
    /// Returns an error on non-zero exit or interrupt.
    async fn apply(&self, targets: &[String]) -> Result<(), CommandError>;

    /// Whether `package` carries the manual-install mark. `false` on any failure.
    async fn is_manually_installed(&self, package: &str) -> bool;

    /// Set the manual-install mark on `packages`.
    ///
    /// # Errors
    ///
    /// Returns an error if the marking tool fails.
    async fn mark_manual(&self, packages: &[String]) -> Result<(), CommandError>;

    /// Packages a preview output reports as newly installed.
    fn parse_dry_run_installs(&self, output: &str) -> Vec<String> {
        crate::domain::parse_dry_run_installs(output)
    }
}

// ── Confirmation Port ─────────────────────────────────────────────────────────

/// Asks the user for consent. Returns `Ok(false)` when declined.
pub trait Confirmer {
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be read; an interrupt surfaces as
    /// `io::ErrorKind::Interrupted`.
    fn confirm(&self, prompt: &str) -> std::io::Result<bool>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an informational note.
    fn info(&self, message: &str);
    /// Show a titled block, e.g. a preview before confirmation.
    fn summary(&self, title: &str, body: &str);
}
