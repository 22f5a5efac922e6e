//! `bdapt rm <bundle> <packages...> [--keep-pkg] [--force]`

use anyhow::Result;
use bdapt_common::{parse_package_args, validate_bundle_name};

use crate::app::AppContext;
use crate::commands::RmArgs;
use crate::domain::SyncError;

/// Run `bdapt rm`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, a package is not in the
/// bundle, or any step of the update fails.
pub async fn run(app: &AppContext, args: RmArgs) -> Result<()> {
    validate_bundle_name(&args.bundle).map_err(SyncError::from)?;
    parse_package_args(&args.packages, "package removal").map_err(SyncError::from)?;
    app.ensure_privileged()?;

    let reporter = app.reporter();
    let report = app
        .orchestrator(&reporter)
        .remove(&args.bundle, &args.packages, args.keep_pkg, args.force)
        .await?;
    tracing::debug!(?report, "packages removed");
    Ok(())
}
