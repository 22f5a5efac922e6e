//! Infrastructure implementation of the `MetapackageBuilder` port using
//! `equivs-build`.
//!
//! Each build gets its own scratch directory. The directory travels with the
//! returned `Artifact` and is removed when the artifact is dropped, or
//! immediately on any error.

use std::path::{Path, PathBuf};

use bdapt_common::Bundle;
use chrono::Utc;

use crate::application::ports::{Artifact, CommandRunner, MetapackageBuilder};
use crate::domain::CommandError;
use crate::domain::manifest::{render_control, version_token};
use crate::infra::command_runner::ensure_success;

pub const CONTROL_FILE: &str = "control";

/// Builds metapackages with `equivs-build`.
#[derive(Debug, Clone)]
pub struct EquivsBuilder<R> {
    runner: R,
    program: String,
    maintainer: String,
}

impl<R: CommandRunner> EquivsBuilder<R> {
    pub fn new(runner: R, program: impl Into<String>, maintainer: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            maintainer: maintainer.into(),
        }
    }
}

fn io_error(context: String) -> impl FnOnce(std::io::Error) -> CommandError {
    move |source| CommandError::Io { context, source }
}

/// First `.deb` in `dir`, by file name.
fn find_deb(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut debs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "deb"))
        .collect();
    debs.sort();
    Ok(debs.into_iter().next())
}

impl<R: CommandRunner> MetapackageBuilder for EquivsBuilder<R> {
    fn render(&self, bundle_name: &str, bundle: &Bundle) -> String {
        render_control(bundle_name, bundle, &self.maintainer, &version_token(Utc::now()))
    }

    async fn build(&self, bundle_name: &str, bundle: &Bundle) -> Result<Artifact, CommandError> {
        if !self.runner.program_exists(&self.program) {
            return Err(CommandError::ToolMissing {
                program: self.program.clone(),
                hint: "Please install equivs package: sudo apt install equivs".to_string(),
            });
        }

        let scratch = tempfile::Builder::new()
            .prefix("bdapt-")
            .tempdir()
            .map_err(io_error("cannot create build directory".to_string()))?;
        tracing::debug!(dir = %scratch.path().display(), "build directory created");

        let control_path = scratch.path().join(CONTROL_FILE);
        std::fs::write(&control_path, self.render(bundle_name, bundle))
            .map_err(io_error(format!("cannot write {}", control_path.display())))?;

        let args = [CONTROL_FILE];
        let output = self
            .runner
            .run_in(scratch.path(), &self.program, &args)
            .await?;
        ensure_success(&self.program, &args, output)?;

        let deb = find_deb(scratch.path())
            .map_err(io_error(format!("cannot read {}", scratch.path().display())))?
            .ok_or_else(|| CommandError::NoArtifact {
                program: self.program.clone(),
                dir: scratch.path().to_path_buf(),
            })?;
        tracing::debug!(deb = %deb.display(), "metapackage built");
        Ok(Artifact::new(deb, scratch))
    }
}
