//! `bdapt del <bundle> [--keep-pkg] [--force]`

use anyhow::Result;
use bdapt_common::validate_bundle_name;

use crate::app::AppContext;
use crate::commands::DelArgs;
use crate::domain::SyncError;

/// Run `bdapt del`.
///
/// # Errors
///
/// Returns an error if the bundle is missing or its metapackage cannot be
/// removed (unless `--force`).
pub async fn run(app: &AppContext, args: DelArgs) -> Result<()> {
    validate_bundle_name(&args.bundle).map_err(SyncError::from)?;
    app.ensure_privileged()?;

    let reporter = app.reporter();
    let report = app
        .orchestrator(&reporter)
        .delete(&args.bundle, args.keep_pkg, args.force)
        .await?;
    tracing::debug!(?report, "bundle deleted");
    Ok(())
}
