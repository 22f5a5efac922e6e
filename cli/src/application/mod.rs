//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`; never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    Artifact, BundleStore, CommandRunner, Confirmer, MetapackageBuilder, PackageSystem,
    ProgressReporter,
};
pub use services::bundle_sync::{BundleSync, Outcome, SyncOptions, SyncReport};
