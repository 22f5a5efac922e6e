//! Application service: decides which orphaned packages may leave the system.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Never mutates persisted state.

use std::collections::BTreeSet;
use std::fmt;

use bdapt_common::BundleStorage;

use crate::application::ports::{PackageSystem, ProgressReporter};

/// Why a candidate package stays installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetainReason {
    /// Another bundle still lists it.
    OtherBundle,
    /// The user installed it explicitly.
    ManuallyInstalled,
}

impl fmt::Display for RetainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OtherBundle => f.write_str("required by other bundles"),
            Self::ManuallyInstalled => f.write_str("manually installed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retained {
    pub package: String,
    pub reason: RetainReason,
}

/// Outcome of [`resolve_removable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub removable: Vec<String>,
    pub retained: Vec<Retained>,
}

/// Union of package names across every bundle except `exclude`.
#[must_use]
pub fn packages_in_other_bundles(storage: &BundleStorage, exclude: &str) -> BTreeSet<String> {
    storage
        .bundles
        .iter()
        .filter(|(name, _)| name.as_str() != exclude)
        .flat_map(|(_, bundle)| bundle.packages.keys().cloned())
        .collect()
}

/// Split `candidates` into packages that may be removed and packages that stay.
///
/// With `force`, every candidate is removable. Otherwise a candidate stays if
/// another bundle lists it or it carries the manual-install mark; the shared
/// check runs first so the mark is only queried when needed. Each retained
/// package is reported through `reporter`.
pub async fn resolve_removable(
    candidates: &[String],
    storage: &BundleStorage,
    exclude: &str,
    force: bool,
    packages: &impl PackageSystem,
    reporter: &impl ProgressReporter,
) -> Resolution {
    if force {
        return Resolution {
            removable: candidates.to_vec(),
            retained: Vec::new(),
        };
    }

    let shared = packages_in_other_bundles(storage, exclude);
    let mut resolution = Resolution::default();

    for package in candidates {
        let reason = if shared.contains(package) {
            Some(RetainReason::OtherBundle)
        } else if packages.is_manually_installed(package).await {
            Some(RetainReason::ManuallyInstalled)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                tracing::debug!(%package, ?reason, "retaining package");
                reporter.info(&format!("Keeping '{package}' ({reason})"));
                resolution.retained.push(Retained {
                    package: package.clone(),
                    reason,
                });
            }
            None => resolution.removable.push(package.clone()),
        }
    }
    resolution
}
