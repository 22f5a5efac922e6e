//! `bdapt show <bundle>`: print a bundle's definition.

use anyhow::Result;
use owo_colors::OwoColorize as _;

use crate::app::AppContext;
use crate::application::services::catalog::show_bundle;
use crate::commands::BundleArg;

/// Run `bdapt show`.
///
/// # Errors
///
/// Returns an error if the name is invalid or the bundle does not exist.
pub fn run(app: &AppContext, args: &BundleArg) -> Result<()> {
    let bundle = show_bundle(&app.store, &args.bundle)?;
    let styles = &app.output.styles;

    println!("{} {}", "Bundle:".style(styles.header), args.bundle.style(styles.bundle));
    match &bundle.description {
        Some(desc) => println!("{} {desc}", "Description:".style(styles.header)),
        None => println!(
            "{} {}",
            "Description:".style(styles.header),
            "No description".style(styles.dim)
        ),
    }

    if bundle.packages.is_empty() {
        println!("{}", "No packages in bundle".style(styles.warning));
        return Ok(());
    }
    println!(
        "{}",
        format!("Packages ({}):", bundle.packages.len()).style(styles.header)
    );
    for (name, spec) in &bundle.packages {
        println!("  • {}", spec.to_relation(name));
    }
    Ok(())
}
