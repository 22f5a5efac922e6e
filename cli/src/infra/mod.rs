//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! bundle record on disk, metapackage builds, the package manager, privilege
//! escalation, and configuration files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod apt;
pub mod command_runner;
pub mod config;
pub mod equivs;
pub mod privilege;
pub mod store;

pub use apt::AptPackageSystem;
pub use command_runner::TokioCommandRunner;
pub use config::YamlConfigStore;
pub use equivs::EquivsBuilder;
pub use store::JsonBundleStore;
