//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the configuration and the concrete infrastructure so
//! command handlers only decide what to run, never how to wire it.

use anyhow::Result;

use crate::application::{BundleSync, SyncOptions};
use crate::domain::{BdaptConfig, SyncError};
use crate::infra::{
    AptPackageSystem, EquivsBuilder, JsonBundleStore, TokioCommandRunner, YamlConfigStore,
    privilege,
};
use crate::output::{DialoguerConfirmer, OutputContext, TerminalReporter};

/// Orchestrator wired to the production infrastructure.
pub type Orchestrator<'a> = BundleSync<
    'a,
    JsonBundleStore,
    EquivsBuilder<TokioCommandRunner>,
    AptPackageSystem<TokioCommandRunner>,
    DialoguerConfirmer,
    TerminalReporter<'a>,
>;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Skip confirmation prompts (`-y`, `BDAPT_YES`; `CI` also implies it).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Loaded configuration.
    pub config: BdaptConfig,
    /// Bundle record on disk.
    pub store: JsonBundleStore,
    /// Metapackage builder.
    pub builder: EquivsBuilder<TokioCommandRunner>,
    /// System package manager.
    pub packages: AptPackageSystem<TokioCommandRunner>,
    /// When `true`, changes are applied without asking.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but is invalid.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let config = YamlConfigStore::from_env().load()?;
        Ok(Self::with_config(flags, config))
    }

    /// Construct from an already loaded configuration.
    #[must_use]
    pub fn with_config(flags: &AppFlags, config: BdaptConfig) -> Self {
        let ci_env = std::env::var_os("CI").is_some();
        let runner = TokioCommandRunner::new();
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            store: JsonBundleStore::new(&config.data_dir),
            builder: EquivsBuilder::new(runner, &config.equivs_program, &config.maintainer),
            packages: AptPackageSystem::new(runner, &config.apt_program, &config.apt_mark_program),
            non_interactive: flags.yes || ci_env,
            config,
        }
    }

    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            non_interactive: self.non_interactive,
            quiet: self.output.quiet,
        }
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Orchestrator for one mutating command, reporting through `reporter`.
    #[must_use]
    pub fn orchestrator<'a>(&'a self, reporter: &'a TerminalReporter<'a>) -> Orchestrator<'a> {
        BundleSync::new(
            &self.store,
            &self.builder,
            &self.packages,
            &DialoguerConfirmer,
            reporter,
            self.sync_options(),
        )
    }

    /// Re-run as root if needed. Called once, before any mutating work.
    ///
    /// # Errors
    ///
    /// Returns an error if escalation is required and fails.
    pub fn ensure_privileged(&self) -> Result<()> {
        privilege::ensure_privileged(self.config.escalate).map_err(SyncError::from)?;
        Ok(())
    }
}
