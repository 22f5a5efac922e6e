//! Metapackage control manifest rendering.
//!
//! Pure functions only. The caller supplies the version token so output is
//! reproducible in tests.

use bdapt_common::{Bundle, unit_name};
use chrono::{DateTime, Utc};

/// Fixed version prefix; the timestamp suffix makes every rebuild newer.
pub const VERSION_BASE: &str = "1.0";

/// Default `Maintainer` field value.
pub const DEFAULT_MAINTAINER: &str = "bdapt <bdapt@localhost>";

/// Build a version token that sorts after every token produced earlier.
///
/// The `~` separator sorts the token below a plain `1.0`, and the
/// nanosecond suffix keeps rebuilds within the same second distinct.
#[must_use]
pub fn version_token(at: DateTime<Utc>) -> String {
    format!("{VERSION_BASE}~{}", at.format("%Y%m%d%H%M%S.%f"))
}

/// Description used when the bundle has none.
#[must_use]
pub fn default_description(bundle_name: &str) -> String {
    format!("Generated metapackage for bdapt bundle '{bundle_name}'")
}

/// Render the `control` file consumed by the metapackage build tool.
///
/// `Depends` is emitted only when the bundle has at least one package.
#[must_use]
pub fn render_control(bundle_name: &str, bundle: &Bundle, maintainer: &str, version: &str) -> String {
    let description = bundle
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map_or_else(|| default_description(bundle_name), single_line);

    let mut control = format!(
        "Package: {}\n\
         Version: {version}\n\
         Maintainer: {maintainer}\n\
         Architecture: all\n\
         Description: {description}\n",
        unit_name(bundle_name),
    );

    if !bundle.packages.is_empty() {
        control.push_str("Depends: ");
        control.push_str(&bundle.depends_line());
        control.push('\n');
    }
    control
}

/// Control fields are single-line; a multi-line value would start a new field.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
