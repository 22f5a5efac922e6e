//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. An interrupt (Ctrl-C) during the wait
//! surfaces as `CommandError::Interrupted`. Plain runs kill the child first;
//! `run_to_exit` lets the child finish on its own terms.

use std::io;
use std::path::Path;
use std::process::{Output, Stdio};

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::application::ports::CommandRunner;
use crate::domain::CommandError;

/// What happens to a running child when the user interrupts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnInterrupt {
    Kill,
    WaitForExit,
}

/// Production `CommandRunner`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn execute(
        &self,
        mut command: Command,
        shown: String,
        on_interrupt: OnInterrupt,
    ) -> Result<Output, CommandError> {
        tracing::debug!(command = %shown, "spawning");
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| spawn_error(&shown, source))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let mut finished = Box::pin(async {
            let (status, stdout, stderr) = tokio::join!(
                child.wait(),
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut h) = stdout_handle {
                        let _ = h.read_to_end(&mut buf).await;
                    }
                    buf
                },
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut h) = stderr_handle {
                        let _ = h.read_to_end(&mut buf).await;
                    }
                    buf
                },
            );
            let status = status.map_err(|source| CommandError::Io {
                context: format!("waiting for {shown}"),
                source,
            })?;
            tracing::debug!(command = %shown, %status, "exited");
            Ok::<_, CommandError>(Output { status, stdout, stderr })
        });

        tokio::select! {
            result = &mut finished => result,
            Ok(()) = tokio::signal::ctrl_c() => {
                match on_interrupt {
                    OnInterrupt::WaitForExit => {
                        tracing::debug!(command = %shown, "interrupted, waiting for child to exit");
                        if let Err(err) = finished.await {
                            tracing::debug!(command = %shown, error = %err, "wait after interrupt failed");
                        }
                    }
                    OnInterrupt::Kill => {
                        tracing::debug!(command = %shown, "interrupted, killing child");
                        drop(finished);
                        let _ = child.kill().await;
                    }
                }
                Err(CommandError::Interrupted { command: shown })
            }
        }
    }
}

/// Turn a non-zero exit into `CommandError::Failed`, keeping captured output.
///
/// # Errors
///
/// Returns `CommandError::Failed` when `output.status` is not success.
pub fn ensure_success(program: &str, args: &[&str], output: Output) -> Result<Output, CommandError> {
    if output.status.success() {
        return Ok(output);
    }
    Err(CommandError::Failed {
        command: display_command(program, args),
        status: output.status.to_string(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

pub(crate) fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn_error(shown: &str, source: io::Error) -> CommandError {
    if source.kind() == io::ErrorKind::NotFound {
        let program = shown.split(' ').next().unwrap_or(shown).to_string();
        CommandError::ToolMissing {
            hint: format!("Make sure '{program}' is installed and on PATH."),
            program,
        }
    } else {
        CommandError::Io {
            context: format!("failed to spawn {shown}"),
            source,
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    fn program_exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<Output, CommandError> {
        let mut command = Command::new(program);
        command.args(args);
        self.execute(command, display_command(program, args), OnInterrupt::Kill)
            .await
    }

    async fn run_to_exit(&self, program: &str, args: &[&str]) -> Result<Output, CommandError> {
        let mut command = Command::new(program);
        command.args(args);
        self.execute(
            command,
            display_command(program, args),
            OnInterrupt::WaitForExit,
        )
        .await
    }

    async fn run_in(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<Output, CommandError> {
        let mut command = Command::new(program);
        command.args(args).current_dir(dir);
        self.execute(command, display_command(program, args), OnInterrupt::Kill)
            .await
    }
}
