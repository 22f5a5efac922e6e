//! `bdapt sync <bundle>`: reinstall a bundle from its stored definition.

use anyhow::Result;
use bdapt_common::validate_bundle_name;

use crate::app::AppContext;
use crate::commands::BundleArg;
use crate::domain::SyncError;

/// Run `bdapt sync`.
///
/// # Errors
///
/// Returns an error if the bundle is missing or any step of the install fails.
pub async fn run(app: &AppContext, args: BundleArg) -> Result<()> {
    validate_bundle_name(&args.bundle).map_err(SyncError::from)?;
    app.ensure_privileged()?;

    let reporter = app.reporter();
    let report = app.orchestrator(&reporter).sync(&args.bundle).await?;
    tracing::debug!(?report, "bundle synced");
    Ok(())
}
