//! Application service: read-only bundle queries for `ls` and `show`.
//!
//! Never takes the store lock and never escalates privileges.

use bdapt_common::{Bundle, validate_bundle_name};

use crate::application::ports::BundleStore;
use crate::domain::SyncError;

/// One row of the bundle listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub name: String,
    pub package_count: usize,
    pub description: Option<String>,
}

/// Every bundle, sorted by name.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_bundles(store: &impl BundleStore) -> Result<Vec<BundleSummary>, SyncError> {
    let storage = store.load()?;
    Ok(storage
        .bundles
        .into_iter()
        .map(|(name, bundle)| BundleSummary {
            name,
            package_count: bundle.packages.len(),
            description: bundle.description,
        })
        .collect())
}

/// The stored definition of bundle `name`.
///
/// # Errors
///
/// Returns a validation error for a malformed name, `NotFound` if the bundle
/// does not exist, or a storage error.
pub fn show_bundle(store: &impl BundleStore, name: &str) -> Result<Bundle, SyncError> {
    validate_bundle_name(name)?;
    store
        .load()?
        .bundles
        .remove(name)
        .ok_or_else(|| SyncError::NotFound(name.to_string()))
}
