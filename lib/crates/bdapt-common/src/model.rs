//! Bundle data model persisted to `bundles.json`.
//!
//! Maps are `BTreeMap` so serialized output has a stable key order and the
//! rendered `Depends` line is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Prefix that turns a bundle name into its metapackage name.
pub const UNIT_PREFIX: &str = "bdapt-";

/// Name of the installable unit that backs `bundle_name`.
#[must_use]
pub fn unit_name(bundle_name: &str) -> String {
    format!("{UNIT_PREFIX}{bundle_name}")
}

/// One desired package inside a bundle.
///
/// The constraint is passed to the package manager verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PackageSpec {
    #[must_use]
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
        }
    }

    /// Render as a Debian relation: `name` or `name (constraint)`.
    #[must_use]
    pub fn to_relation(&self, name: &str) -> String {
        match self.version.as_deref() {
            Some(v) if !v.trim().is_empty() => format!("{name} ({})", v.trim()),
            _ => name.to_string(),
        }
    }
}

/// A named, declarative set of desired packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Never blank: an empty or whitespace-only description reads as `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_blank"
    )]
    pub description: Option<String>,
    #[serde(default)]
    pub packages: BTreeMap<String, PackageSpec>,
}

impl Bundle {
    #[must_use]
    pub fn new(description: Option<String>) -> Self {
        Self {
            description: drop_blank(description),
            packages: BTreeMap::new(),
        }
    }

    /// Comma-separated relation list for the `Depends` field, in key order.
    /// Empty when the bundle has no packages.
    #[must_use]
    pub fn depends_line(&self) -> String {
        self.packages
            .iter()
            .map(|(name, spec)| spec.to_relation(name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn drop_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(drop_blank)
}

/// Root persisted object: bundle name to bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleStorage {
    #[serde(default)]
    pub bundles: BTreeMap<String, Bundle>,
}

impl BundleStorage {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Bundle> {
        self.bundles.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bundles.contains_key(name)
    }
}
