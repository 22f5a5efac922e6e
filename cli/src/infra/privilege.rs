//! Privilege escalation for mutating commands.
//!
//! When the process is not root, it replaces itself with
//! `sudo <same executable> <same arguments>`. This happens at most once per
//! invocation: the re-executed process carries `BDAPT_REEXEC` and refuses to
//! escalate again.

use std::os::unix::process::CommandExt as _;
use std::process::Command;

use crate::domain::StorageError;

/// Marker set on the re-executed process.
pub const REEXEC_ENV: &str = "BDAPT_REEXEC";

/// Variables that must survive `sudo`'s environment reset.
const PRESERVED_ENV: &[&str] = &[
    "BDAPT_CONFIG",
    "BDAPT_DATA_DIR",
    "BDAPT_LOG",
    "BDAPT_YES",
    "NO_COLOR",
    "CI",
    REEXEC_ENV,
];

/// Whether the effective user is root.
#[must_use]
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Make sure the rest of the process runs as root.
///
/// Returns immediately when already root, or when `escalate` is off (the
/// store and package manager then report their own permission errors).
/// Otherwise this only returns on failure.
///
/// # Errors
///
/// Returns `StorageError::Privilege` if `sudo` is unavailable, the exec
/// fails, or the process is still unprivileged after a re-exec.
pub fn ensure_privileged(escalate: bool) -> Result<(), StorageError> {
    if is_root() || !escalate {
        return Ok(());
    }
    if std::env::var_os(REEXEC_ENV).is_some() {
        return Err(StorageError::Privilege(
            "still not running as root after sudo".to_string(),
        ));
    }
    if which::which("sudo").is_err() {
        return Err(StorageError::Privilege(
            "root privileges are required and sudo was not found".to_string(),
        ));
    }
    let exe = std::env::current_exe().map_err(|e| {
        StorageError::Privilege(format!("cannot locate the bdapt executable: {e}"))
    })?;

    tracing::debug!(exe = %exe.display(), "re-executing through sudo");
    let err = Command::new("sudo")
        .arg(format!("--preserve-env={}", PRESERVED_ENV.join(",")))
        .arg("--")
        .arg(exe)
        .args(std::env::args_os().skip(1))
        .env(REEXEC_ENV, "1")
        .exec();
    Err(StorageError::Privilege(format!(
        "failed to re-run through sudo: {err}"
    )))
}
