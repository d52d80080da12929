//! Child process execution.
//!
//! The router never spawns processes itself; it hands `ComposeCommand`s to a
//! `CommandRunner`. `SystemRunner` is the real implementation, `DryRunRunner`
//! prints what would run, and tests substitute a recording runner.

use std::process::{Command, Stdio};

use crate::compose::ComposeCommand;
use crate::errors::DispatchError;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub success: bool,
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    pub fn failed(code: Option<i32>) -> Self {
        Self {
            success: false,
            code,
        }
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Capability to run external commands.
pub trait CommandRunner {
    /// Run with stdin, stdout and stderr inherited from this process.
    fn run(&self, command: &ComposeCommand) -> Result<ExitOutcome, DispatchError>;

    /// Run with stdout captured and return it. A non-zero exit is an error.
    fn capture(&self, command: &ComposeCommand) -> Result<String, DispatchError>;

    /// Whether `program args..` exits successfully, all output discarded.
    fn probe(&self, program: &str, args: &[&str]) -> bool;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command: &ComposeCommand) -> Result<ExitOutcome, DispatchError> {
        (**self).run(command)
    }

    fn capture(&self, command: &ComposeCommand) -> Result<String, DispatchError> {
        (**self).capture(command)
    }

    fn probe(&self, program: &str, args: &[&str]) -> bool {
        (**self).probe(program, args)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(command: &ComposeCommand) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.argv());
        cmd.envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn spawn_error(command: &ComposeCommand, source: std::io::Error) -> DispatchError {
        DispatchError::SpawnFailed {
            program: command.program().to_string(),
            source,
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ComposeCommand) -> Result<ExitOutcome, DispatchError> {
        tracing::debug!(command = %command.display(), "running");
        let status = Self::command(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Self::spawn_error(command, e))?;
        tracing::debug!(code = ?status.code(), "child exited");
        Ok(status.into())
    }

    fn capture(&self, command: &ComposeCommand) -> Result<String, DispatchError> {
        tracing::debug!(command = %command.display(), "capturing");
        let output = Self::command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Self::spawn_error(command, e))?;

        if !output.status.success() {
            return Err(DispatchError::CommandFailed {
                command: command.display(),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn probe(&self, program: &str, args: &[&str]) -> bool {
        let ok = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        tracing::debug!(program, ?args, ok, "probe");
        ok
    }
}

/// Prints command lines instead of running them.
///
/// Probes still run for real since they only inspect the host. Captures
/// report a placeholder container id so liveness checks pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &ComposeCommand) -> Result<ExitOutcome, DispatchError> {
        println!("{}", command.display());
        Ok(ExitOutcome::ok())
    }

    fn capture(&self, command: &ComposeCommand) -> Result<String, DispatchError> {
        tracing::info!(command = %command.display(), "dry run: assuming services are running");
        Ok("dry-run\n".to_string())
    }

    fn probe(&self, program: &str, args: &[&str]) -> bool {
        SystemRunner.probe(program, args)
    }
}
