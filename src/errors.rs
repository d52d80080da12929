//! Typed error hierarchy for the dispatcher.
//!
//! Every failure the router or the bootstrap flows can report is a
//! `DispatchError`. Each variant maps to a stable process exit code so that
//! scripts wrapping `nuxi-docker` can branch on the kind of failure:
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | success                                                   |
//! | 1    | spawn/IO failure, or a child killed by a signal           |
//! | 2    | usage error or unmet precondition                         |
//! | 3    | the compose environment is not running                    |
//! | n    | the child's own non-zero exit code                        |

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for usage errors and unmet preconditions.
pub const EXIT_PRECONDITION: u8 = 2;
/// Exit code when the liveness check finds no running services.
pub const EXIT_NOT_RUNNING: u8 = 3;
/// Exit code for failures that carry no better code.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unable to find Docker Compose file: '{}'", path.display())]
    MissingComposeFile { path: PathBuf },

    #[error("The container is not running.")]
    NotRunning,

    #[error("Command exited with {}: {command}", describe_code(*code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{} already exists, refusing to overwrite it", path.display())]
    ComposeFileExists { path: PathBuf },

    #[error("Template '{name}' is missing from {location}")]
    TemplateMissing { name: String, location: String },

    #[error("Environment variable {name} is not set (add it to .env)")]
    MissingCredential { name: &'static str },

    #[error("Invalid project directory '{name}': {reason}")]
    InvalidProjectDirectory { name: String, reason: &'static str },

    #[error("Project directory {} was not created by the init service", path.display())]
    ProjectDirectoryMissing { path: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl DispatchError {
    /// The process exit code this error should terminate with.
    pub fn exit_code(&self) -> u8 {
        match self {
            DispatchError::MissingComposeFile { .. }
            | DispatchError::ComposeFileExists { .. }
            | DispatchError::TemplateMissing { .. }
            | DispatchError::MissingCredential { .. }
            | DispatchError::InvalidProjectDirectory { .. }
            | DispatchError::ProjectDirectoryMissing { .. } => EXIT_PRECONDITION,
            DispatchError::NotRunning => EXIT_NOT_RUNNING,
            DispatchError::CommandFailed { code, .. } => match code {
                Some(code) => u8::try_from(*code)
                    .ok()
                    .filter(|c| *c != 0)
                    .unwrap_or(EXIT_FAILURE),
                None => EXIT_FAILURE,
            },
            DispatchError::SpawnFailed { .. } | DispatchError::Io { .. } | DispatchError::Other(_) => {
                EXIT_FAILURE
            }
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DispatchError::Io {
            path: path.into(),
            source,
        }
    }
}
