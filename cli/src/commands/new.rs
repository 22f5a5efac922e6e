//! `bdapt new <bundle> <packages...> [--desc]`: create and install a bundle.

use anyhow::Result;
use bdapt_common::{parse_package_args, validate_bundle_name};

use crate::app::AppContext;
use crate::commands::NewArgs;
use crate::domain::SyncError;

/// Run `bdapt new`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the bundle exists, or any
/// step of the install fails.
pub async fn run(app: &AppContext, args: NewArgs) -> Result<()> {
    validate_bundle_name(&args.bundle).map_err(SyncError::from)?;
    parse_package_args(&args.packages, "bundle creation").map_err(SyncError::from)?;
    app.ensure_privileged()?;

    let reporter = app.reporter();
    let report = app
        .orchestrator(&reporter)
        .create(&args.bundle, &args.packages, args.desc)
        .await?;
    tracing::debug!(?report, "bundle created");
    Ok(())
}
