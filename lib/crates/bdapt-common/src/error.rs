use thiserror::Error;

/// Input rejected before any storage or system side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Bundle name cannot be empty")]
    EmptyBundleName,

    #[error(
        "Invalid bundle name '{0}'. Must contain only lowercase letters, numbers, dots, \
         and hyphens, and must start and end with a letter or number."
    )]
    InvalidBundleName(String),

    #[error("At least one package must be specified for {operation}")]
    EmptyPackageList { operation: String },

    #[error("Package names cannot be empty or whitespace-only")]
    EmptyPackageName,

    #[error(
        "Invalid package name '{0}'. Package names must start with a letter or number and \
         contain only letters, numbers, plus signs, dots, and hyphens."
    )]
    InvalidPackageName(String),

    #[error("Invalid version constraint in '{arg}': {reason}")]
    InvalidVersionConstraint { arg: String, reason: String },
}
