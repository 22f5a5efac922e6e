//! `bdapt add <bundle> <packages...>`: add packages to a bundle.

use anyhow::Result;
use bdapt_common::{parse_package_args, validate_bundle_name};

use crate::app::AppContext;
use crate::commands::AddArgs;
use crate::domain::SyncError;

/// Run `bdapt add`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the bundle is missing, or
/// any step of the install fails.
pub async fn run(app: &AppContext, args: AddArgs) -> Result<()> {
    validate_bundle_name(&args.bundle).map_err(SyncError::from)?;
    parse_package_args(&args.packages, "adding packages").map_err(SyncError::from)?;
    app.ensure_privileged()?;

    let reporter = app.reporter();
    let report = app
        .orchestrator(&reporter)
        .add(&args.bundle, &args.packages)
        .await?;
    tracing::debug!(?report, "packages added");
    Ok(())
}
