//! bdapt CLI library: exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;

use crate::domain::SyncError;
use crate::domain::error::EXIT_FAILURE;

/// Process exit code for an error returned by [`cli::Cli::run`].
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SyncError>()
        .map_or(EXIT_FAILURE, SyncError::exit_code)
}
