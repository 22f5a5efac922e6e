//! `bdapt ls`: list bundles.

use anyhow::Result;
use owo_colors::OwoColorize as _;

use crate::app::AppContext;
use crate::application::services::catalog::{BundleSummary, list_bundles};

/// Run `bdapt ls`.
///
/// # Errors
///
/// Returns an error if the bundle record cannot be read.
pub fn run(app: &AppContext) -> Result<()> {
    let bundles = list_bundles(&app.store)?;
    if bundles.is_empty() {
        println!("{}", "No bundles found".style(app.output.styles.warning));
        return Ok(());
    }
    for bundle in &bundles {
        println!("{}", format_row(app, bundle));
    }
    Ok(())
}

fn format_row(app: &AppContext, bundle: &BundleSummary) -> String {
    let styles = &app.output.styles;
    let count = bundle.package_count;
    let plural = if count == 1 { "" } else { "s" };
    let mut row = format!(
        "{} ({count} package{plural})",
        bundle.name.style(styles.bundle)
    );
    if let Some(desc) = &bundle.description {
        row.push(' ');
        row.push_str(&desc.style(styles.dim).to_string());
    }
    row
}
