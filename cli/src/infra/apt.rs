//! Infrastructure implementation of the `PackageSystem` port over
//! `apt-get` and `apt-mark`.
//!
//! Install and remove share one invocation: `apt-get install --autoremove -f`
//! with removal targets written as `name-`.

use crate::application::ports::{CommandRunner, PackageSystem};
use crate::domain::{CommandError, DryRunSummary};
use crate::infra::command_runner::ensure_success;

const INSTALL_ARGS: [&str; 3] = ["install", "--autoremove", "-f"];
const APPLY_MODE: &str = "-y";
const PREVIEW_MODE: &str = "--dry-run";

/// `apt-get`/`apt-mark` backed package system.
#[derive(Debug, Clone)]
pub struct AptPackageSystem<R> {
    runner: R,
    apt: String,
    apt_mark: String,
}

impl<R: CommandRunner> AptPackageSystem<R> {
    pub fn new(runner: R, apt: impl Into<String>, apt_mark: impl Into<String>) -> Self {
        Self {
            runner,
            apt: apt.into(),
            apt_mark: apt_mark.into(),
        }
    }

    fn require_apt(&self) -> Result<(), CommandError> {
        if self.tool_exists(&self.apt) {
            Ok(())
        } else {
            Err(CommandError::ToolMissing {
                program: self.apt.clone(),
                hint: "bdapt requires an APT-based system.".to_string(),
            })
        }
    }

    /// `apt-get install` over `targets`. Only the `-y` run changes the
    /// system, so only it is allowed to finish after an interrupt.
    async fn install(&self, targets: &[String], mode: &str) -> Result<String, CommandError> {
        self.require_apt()?;
        let args: Vec<&str> = INSTALL_ARGS
            .iter()
            .copied()
            .chain(targets.iter().map(String::as_str))
            .chain(std::iter::once(mode))
            .collect();
        let output = if mode == APPLY_MODE {
            self.runner.run_to_exit(&self.apt, &args).await?
        } else {
            self.runner.run(&self.apt, &args).await?
        };
        let output = ensure_success(&self.apt, &args, output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl<R: CommandRunner> PackageSystem for AptPackageSystem<R> {
    fn tool_exists(&self, program: &str) -> bool {
        self.runner.program_exists(program)
    }

    async fn dry_run(&self, targets: &[String]) -> Result<Option<DryRunSummary>, CommandError> {
        let stdout = self.install(targets, PREVIEW_MODE).await?;
        let summary = DryRunSummary::from_output(&stdout);
        tracing::debug!(?targets, changes = summary.is_some(), "preview finished");
        Ok(summary)
    }

    async fn apply(&self, targets: &[String]) -> Result<(), CommandError> {
        self.install(targets, APPLY_MODE).await?;
        tracing::debug!(?targets, "applied");
        Ok(())
    }

    async fn is_manually_installed(&self, package: &str) -> bool {
        match self.runner.run(&self.apt_mark, &["showmanual", package]).await {
            Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
                .lines()
                .any(|line| line.trim() == package),
            Ok(output) => {
                tracing::debug!(%package, status = %output.status, "manual-mark query failed");
                false
            }
            Err(err) => {
                tracing::debug!(%package, error = %err, "manual-mark query failed");
                false
            }
        }
    }

    async fn mark_manual(&self, packages: &[String]) -> Result<(), CommandError> {
        let args: Vec<&str> = std::iter::once("manual")
            .chain(packages.iter().map(String::as_str))
            .collect();
        let output = self.runner.run(&self.apt_mark, &args).await?;
        ensure_success(&self.apt_mark, &args, output)?;
        Ok(())
    }
}
