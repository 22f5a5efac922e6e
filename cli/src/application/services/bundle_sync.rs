//! Application service: bundle create/add/remove/delete/sync use-cases.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! Create, add and remove run the same pipeline:
//! load → edit in memory → build → preview → confirm → persist → apply →
//! cleanup. `sync` skips the persist step. `delete` previews and applies the
//! metapackage removal first and drops the record afterwards.
//!
//! Consent always precedes any write, so a declined or interrupted prompt
//! leaves storage and the system untouched.

use std::io;

use bdapt_common::{
    Bundle, BundleStorage, parse_package_args, unit_name, validate_bundle_name,
};

use crate::application::ports::{
    BundleStore, Confirmer, MetapackageBuilder, PackageSystem, ProgressReporter,
};
use crate::application::services::conflict::{Retained, resolve_removable};
use crate::domain::error::{delete_remediation, sync_remediation};
use crate::domain::{AbortReason, DryRunSummary, SyncError, removal_target};

/// Prompt shown before every system change.
pub const CONFIRM_PROMPT: &str = "Proceed with these changes?";

/// Title of the preview block.
pub const PREVIEW_TITLE: &str = "Package changes:";

/// Per-invocation behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Skip the confirmation prompt.
    pub non_interactive: bool,
    /// Suppress the preview when no prompt will be shown.
    pub quiet: bool,
}

/// Whether the operation changed the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The preview reported nothing to do.
    Unchanged,
}

/// Result of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: Outcome,
    /// Packages removed from the system during cleanup.
    pub removed: Vec<String>,
    /// Packages cleanup left installed, with the reason.
    pub retained: Vec<Retained>,
    /// Packages marked manually installed instead of being removed.
    pub kept: Vec<String>,
}

impl SyncReport {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            removed: Vec::new(),
            retained: Vec::new(),
            kept: Vec::new(),
        }
    }
}

/// The sync orchestrator, borrowed for the length of one command.
pub struct BundleSync<'a, S, B, P, C, R> {
    store: &'a S,
    builder: &'a B,
    packages: &'a P,
    confirmer: &'a C,
    reporter: &'a R,
    options: SyncOptions,
}

impl<'a, S, B, P, C, R> BundleSync<'a, S, B, P, C, R>
where
    S: BundleStore,
    B: MetapackageBuilder,
    P: PackageSystem,
    C: Confirmer,
    R: ProgressReporter,
{
    pub fn new(
        store: &'a S,
        builder: &'a B,
        packages: &'a P,
        confirmer: &'a C,
        reporter: &'a R,
        options: SyncOptions,
    ) -> Self {
        Self {
            store,
            builder,
            packages,
            confirmer,
            reporter,
            options,
        }
    }

    /// Create bundle `name` from `package_args` and install it.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the bundle is present, plus any pipeline error.
    pub async fn create(
        &self,
        name: &str,
        package_args: &[String],
        description: Option<String>,
    ) -> Result<SyncReport, SyncError> {
        validate_bundle_name(name)?;
        let specs = parse_package_args(package_args, "bundle creation")?;

        let _guard = self.store.lock()?;
        let mut storage = self.store.load()?;
        if storage.contains(name) {
            return Err(SyncError::AlreadyExists(name.to_string()));
        }

        let mut bundle = Bundle::new(description);
        bundle.packages = specs;
        storage.bundles.insert(name.to_string(), bundle);

        let outcome = self.converge(name, &storage, true, &[]).await?;
        self.reporter.success(&format!("Created bundle '{name}'"));
        Ok(SyncReport::new(outcome))
    }

    /// Add packages to bundle `name`. An existing entry takes the new constraint.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the bundle is missing, plus any pipeline error.
    pub async fn add(&self, name: &str, package_args: &[String]) -> Result<SyncReport, SyncError> {
        validate_bundle_name(name)?;
        let specs = parse_package_args(package_args, "adding packages")?;
        let count = specs.len();

        let _guard = self.store.lock()?;
        let mut storage = self.store.load()?;
        let bundle = storage
            .bundles
            .get_mut(name)
            .ok_or_else(|| SyncError::NotFound(name.to_string()))?;
        bundle.packages.extend(specs);

        let outcome = self.converge(name, &storage, true, &[]).await?;
        self.reporter
            .success(&format!("Added {count} package(s) to bundle '{name}'"));
        Ok(SyncReport::new(outcome))
    }

    /// Remove packages from bundle `name`, then clean up orphans.
    ///
    /// With `keep`, the removed packages are marked manually installed and
    /// never removed. With `force`, cleanup ignores the retention checks.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `PackageNotInBundle` before any side effect, plus
    /// any pipeline error.
    pub async fn remove(
        &self,
        name: &str,
        package_args: &[String],
        keep: bool,
        force: bool,
    ) -> Result<SyncReport, SyncError> {
        validate_bundle_name(name)?;
        let requested: Vec<String> = parse_package_args(package_args, "package removal")?
            .into_keys()
            .collect();

        let _guard = self.store.lock()?;
        let mut storage = self.store.load()?;
        let bundle = storage
            .bundles
            .get_mut(name)
            .ok_or_else(|| SyncError::NotFound(name.to_string()))?;
        if let Some(missing) = requested.iter().find(|p| !bundle.packages.contains_key(*p)) {
            return Err(SyncError::PackageNotInBundle {
                bundle: name.to_string(),
                package: missing.clone(),
            });
        }
        for package in &requested {
            bundle.packages.remove(package);
        }

        let keep_list: &[String] = if keep { &requested } else { &[] };
        let outcome = self.converge(name, &storage, true, keep_list).await?;
        self.reporter.success(&format!(
            "Removed {} package(s) from bundle '{name}'",
            requested.len()
        ));

        let mut report = SyncReport::new(outcome);
        if keep {
            report.kept = requested;
        } else {
            self.cleanup(&requested, &storage, name, force, &mut report)
                .await?;
        }
        Ok(report)
    }

    /// Remove bundle `name`'s metapackage from the system, then drop the record.
    ///
    /// The record is only dropped after the metapackage is gone, unless
    /// `force` is set, in which case a failed removal is reported and the
    /// record is dropped anyway.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, an abort, or `ApplyFailed` (record kept) when
    /// removal fails without `force`.
    pub async fn delete(&self, name: &str, keep: bool, force: bool) -> Result<SyncReport, SyncError> {
        validate_bundle_name(name)?;

        let _guard = self.store.lock()?;
        let mut storage = self.store.load()?;
        let bundle = storage
            .bundles
            .remove(name)
            .ok_or_else(|| SyncError::NotFound(name.to_string()))?;
        let members: Vec<String> = bundle.packages.into_keys().collect();

        let unit = unit_name(name);
        let targets = vec![removal_target(&unit)];

        self.reporter.step(&format!("Checking removal of {unit}..."));
        let remove_unit = match self.packages.dry_run(&targets).await {
            Ok(Some(summary)) => {
                self.confirm(&summary)?;
                true
            }
            Ok(None) => {
                tracing::debug!(%unit, "metapackage not installed");
                false
            }
            Err(err) if force && !err.is_interrupt() => {
                self.reporter
                    .warn(&format!("Cannot preview removal of {unit}: {err}"));
                self.ask("Delete the bundle record anyway?")?;
                false
            }
            Err(err) => return Err(err.into()),
        };

        if keep {
            self.mark_kept(&members).await;
        }

        if remove_unit {
            self.reporter.step(&format!("Removing {unit}..."));
            if let Err(err) = self.packages.apply(&targets).await {
                if err.is_interrupt() || !force {
                    return Err(SyncError::apply_failed(err, delete_remediation(name)));
                }
                self.reporter.warn(&format!("Removing {unit} failed: {err}"));
                self.reporter
                    .warn("Deleting the bundle record anyway (--force)");
            }
        }

        self.store.save(&storage)?;
        self.reporter.success(&format!("Deleted bundle '{name}'"));

        let mut report = SyncReport::new(if remove_unit {
            Outcome::Applied
        } else {
            Outcome::Unchanged
        });
        if keep {
            report.kept = members;
        } else {
            self.cleanup(&members, &storage, name, force, &mut report)
                .await?;
        }
        Ok(report)
    }

    /// Rebuild and reinstall bundle `name` from its stored definition.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the bundle is missing, plus any pipeline error.
    pub async fn sync(&self, name: &str) -> Result<SyncReport, SyncError> {
        validate_bundle_name(name)?;

        let _guard = self.store.lock()?;
        let storage = self.store.load()?;
        if !storage.contains(name) {
            return Err(SyncError::NotFound(name.to_string()));
        }

        let outcome = self.converge(name, &storage, false, &[]).await?;
        if outcome == Outcome::Applied {
            self.reporter.success(&format!("Synced bundle '{name}'"));
        }
        Ok(SyncReport::new(outcome))
    }

    // ── Pipeline steps ───────────────────────────────────────────────────────

    /// Build, preview, confirm, persist, and apply bundle `name` as found in
    /// `storage`. The artifact's scratch directory is released on return.
    async fn converge(
        &self,
        name: &str,
        storage: &BundleStorage,
        persist: bool,
        keep: &[String],
    ) -> Result<Outcome, SyncError> {
        let bundle = storage
            .get(name)
            .ok_or_else(|| SyncError::NotFound(name.to_string()))?;

        self.reporter
            .step(&format!("Building metapackage {}...", unit_name(name)));
        let artifact = self.builder.build(name, bundle).await?;
        tracing::debug!(path = %artifact.path().display(), "metapackage built");
        let targets = vec![artifact.target()];

        self.reporter.step("Checking package changes...");
        let Some(summary) = self.packages.dry_run(&targets).await? else {
            if persist {
                self.store.save(storage)?;
            }
            self.mark_kept(keep).await;
            self.reporter.success("No package changes required");
            return Ok(Outcome::Unchanged);
        };

        self.confirm(&summary)?;

        if persist {
            self.store.save(storage)?;
        }
        self.mark_kept(keep).await;

        self.reporter.step("Applying changes...");
        self.packages
            .apply(&targets)
            .await
            .map_err(|err| SyncError::apply_failed(err, sync_remediation(name)))?;
        Ok(Outcome::Applied)
    }

    /// Remove packages that left a bundle, subject to the retention checks.
    ///
    /// Runs after the operation itself succeeded, so only an interrupt or an
    /// unreadable prompt is fatal here.
    async fn cleanup(
        &self,
        candidates: &[String],
        storage: &BundleStorage,
        bundle_name: &str,
        force: bool,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let resolution = resolve_removable(
            candidates,
            storage,
            bundle_name,
            force,
            self.packages,
            self.reporter,
        )
        .await;
        report.retained = resolution.retained;
        if resolution.removable.is_empty() {
            return Ok(());
        }

        let targets: Vec<String> = resolution
            .removable
            .iter()
            .map(|p| removal_target(p))
            .collect();

        self.reporter.step("Checking package cleanup...");
        let summary = match self.packages.dry_run(&targets).await {
            Ok(Some(summary)) => summary,
            Ok(None) => {
                tracing::debug!(?targets, "nothing left to clean up");
                return Ok(());
            }
            Err(err) if err.is_interrupt() => return Err(err.into()),
            Err(err) => {
                self.reporter
                    .warn(&format!("Could not preview package cleanup: {err}"));
                return Ok(());
            }
        };

        match self.confirm(&summary) {
            Ok(()) => {}
            Err(SyncError::Aborted(AbortReason::Declined)) => {
                self.reporter.warn(&format!(
                    "Left installed: {}",
                    resolution.removable.join(", ")
                ));
                return Ok(());
            }
            Err(err) => return Err(err),
        }

        match self.packages.apply(&targets).await {
            Ok(()) => {
                self.reporter.success(&format!(
                    "Removed {} unused package(s)",
                    resolution.removable.len()
                ));
                report.removed = resolution.removable;
                Ok(())
            }
            Err(err) if err.is_interrupt() => Err(err.into()),
            Err(err) => {
                self.reporter
                    .warn(&format!("Package cleanup failed: {err}"));
                Ok(())
            }
        }
    }

    /// Mark `packages` manually installed so autoremove leaves them alone.
    async fn mark_kept(&self, packages: &[String]) {
        if packages.is_empty() {
            return;
        }
        match self.packages.mark_manual(packages).await {
            Ok(()) => self.reporter.info(&format!(
                "Marked as manually installed: {}",
                packages.join(", ")
            )),
            Err(err) => self
                .reporter
                .warn(&format!("Could not mark packages as manually installed: {err}")),
        }
    }

    /// Show the preview and ask for consent.
    fn confirm(&self, summary: &DryRunSummary) -> Result<(), SyncError> {
        if !(self.options.quiet && self.options.non_interactive) {
            self.reporter.summary(PREVIEW_TITLE, &summary.to_string());
        }
        self.ask(CONFIRM_PROMPT)
    }

    fn ask(&self, prompt: &str) -> Result<(), SyncError> {
        if self.options.non_interactive {
            return Ok(());
        }
        match self.confirmer.confirm(prompt) {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::debug!(prompt, "declined");
                Err(SyncError::Aborted(AbortReason::Declined))
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                Err(SyncError::Aborted(AbortReason::Interrupted))
            }
            Err(err) => Err(SyncError::Prompt(err)),
        }
    }
}
