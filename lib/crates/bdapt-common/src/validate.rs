//! Pure validation for bundle names and package arguments.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::model::PackageSpec;

/// Bundle names become part of a Debian package name, so they follow the
/// same rule: lowercase alphanumerics, dots and hyphens, alphanumeric at both
/// ends (or a single alphanumeric character).
pub static BUNDLE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9]([a-z0-9.-]*[a-z0-9])?$").expect("valid regex")
});

pub static PACKAGE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9+.-]*$").expect("valid regex")
});

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-9A-Za-z.+~:-]+$").expect("valid regex")
});

/// Debian relation operators, two-character forms first.
const RELATION_OPS: &[&str] = &["<<", "<=", ">=", ">>", "="];

pub fn validate_bundle_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyBundleName);
    }
    if !BUNDLE_NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidBundleName(name.to_string()));
    }
    Ok(())
}

pub fn validate_package_list<S: AsRef<str>>(
    packages: &[S],
    operation: &str,
) -> Result<(), ValidationError> {
    if packages.is_empty() {
        return Err(ValidationError::EmptyPackageList {
            operation: operation.to_string(),
        });
    }
    Ok(())
}

pub fn validate_package_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPackageName);
    }
    if !PACKAGE_NAME_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidPackageName(name.to_string()));
    }
    Ok(())
}

/// Parse `name` or `name<op><version>` (e.g. `nginx>=1.18`) into a package
/// name and its spec. The stored constraint is normalized to `"<op> <version>"`.
pub fn parse_package_arg(arg: &str) -> Result<(String, PackageSpec), ValidationError> {
    let arg = arg.trim();
    let Some(split) = arg.find(['<', '>', '=']) else {
        validate_package_name(arg)?;
        return Ok((arg.to_string(), PackageSpec::default()));
    };

    let (name, rest) = arg.split_at(split);
    let name = name.trim();
    validate_package_name(name)?;

    let invalid = |reason: &str| ValidationError::InvalidVersionConstraint {
        arg: arg.to_string(),
        reason: reason.to_string(),
    };

    let op = RELATION_OPS
        .iter()
        .find(|op| rest.starts_with(**op))
        .ok_or_else(|| invalid("expected one of <<, <=, =, >=, >>"))?;
    let version = rest[op.len()..].trim();
    if version.is_empty() {
        return Err(invalid("missing version after operator"));
    }
    if !VERSION_RE.is_match(version) {
        return Err(invalid("version contains characters not allowed by Debian"));
    }

    Ok((name.to_string(), PackageSpec::with_version(format!("{op} {version}"))))
}

/// Parse a non-empty list of package arguments. A later duplicate name
/// overrides an earlier one.
pub fn parse_package_args<S: AsRef<str>>(
    args: &[S],
    operation: &str,
) -> Result<BTreeMap<String, PackageSpec>, ValidationError> {
    validate_package_list(args, operation)?;
    args.iter()
        .map(|a| parse_package_arg(a.as_ref()))
        .collect()
}
