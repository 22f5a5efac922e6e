//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod apt;
pub mod config;
pub mod error;
pub mod manifest;

pub use apt::{DryRunSummary, parse_dry_run_installs, parse_dry_run_removals, removal_target};
pub use config::BdaptConfig;
pub use error::{AbortReason, CommandError, StorageError, SyncError};
pub use manifest::{render_control, version_token};
