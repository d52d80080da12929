//! Project bootstrap: `nuxi-docker install` and `nuxi-docker init`.
//!
//! `install` drops the compose setup into an existing project:
//!
//! ```text
//! ./
//! ├── docker-compose.yml   # must not exist yet
//! ├── Dockerfile           # kept if present
//! └── .env                 # kept if present
//! ```
//!
//! `init` scaffolds a new Nuxt project by running the one-shot init service
//! from the bootstrap compose file, then writes the same three files into the
//! new project directory.

use std::path::{Component, Path, PathBuf};

use crate::compose::{ComposeBinary, ComposeCommand};
use crate::config::Settings;
use crate::errors::DispatchError;
use crate::runner::CommandRunner;
use crate::templates::{
    BOOTSTRAP_COMPOSE, CopyReport, INIT_FILES, INSTALL_FILES, TemplateSource, copy_templates,
};

/// Variables passed to the bootstrap compose file.
pub const PROJECT_DIRECTORY: &str = "PROJECT_DIRECTORY";
pub const PARENT_DIRECTORY: &str = "PARENT_DIRECTORY";
pub const DOCKER_USER_UID: &str = "DOCKER_USER_UID";
pub const DOCKER_USER_GID: &str = "DOCKER_USER_GID";

/// Numeric ids the init container runs as, so scaffolded files belong to
/// the invoking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIds {
    pub uid: u32,
    pub gid: u32,
}

impl UserIds {
    #[cfg(unix)]
    pub fn current() -> Self {
        // SAFETY: getuid and getgid cannot fail and touch no memory.
        unsafe {
            Self {
                uid: libc::getuid(),
                gid: libc::getgid(),
            }
        }
    }

    /// The `node` user of the official Node images.
    #[cfg(not(unix))]
    pub fn current() -> Self {
        Self {
            uid: 1000,
            gid: 1000,
        }
    }
}

/// Copy the compose setup into `project_dir`.
///
/// Fails with `ComposeFileExists` and writes nothing if the project already
/// has a compose file.
pub fn install(project_dir: &Path, templates: &TemplateSource) -> Result<CopyReport, DispatchError> {
    copy_templates(templates, INSTALL_FILES, project_dir)
}

/// Result of scaffolding a project.
#[derive(Debug)]
pub struct InitResult {
    /// The new project directory.
    pub project_dir: PathBuf,
    pub report: CopyReport,
}

/// Reject names that would escape the parent directory mounted into the
/// init container.
pub fn validate_directory(name: &str) -> Result<(), DispatchError> {
    let invalid = |reason| DispatchError::InvalidProjectDirectory {
        name: name.to_string(),
        reason,
    };
    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    let path = Path::new(name);
    if path.is_absolute() || path.has_root() {
        return Err(invalid("must be relative to the current directory"));
    }
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(invalid("must not leave the current directory"));
    }
    Ok(())
}

/// `<compose> -f <bootstrap file> run <init service>` with the project
/// variables overlaid on the environment.
pub fn bootstrap_command(
    compose: &ComposeBinary,
    bootstrap_file: &Path,
    init_service: &str,
    parent_dir: &Path,
    directory: &str,
    ids: UserIds,
) -> ComposeCommand {
    ComposeCommand::new(compose.clone(), bootstrap_file)
        .args(["run", init_service])
        .env(PROJECT_DIRECTORY, directory)
        .env(PARENT_DIRECTORY, parent_dir.to_string_lossy())
        .env(DOCKER_USER_UID, ids.uid.to_string())
        .env(DOCKER_USER_GID, ids.gid.to_string())
        .current_dir(parent_dir)
}

/// The command `init_project` would run, without staging or running it.
pub fn preview_init(
    settings: &Settings,
    directory: &str,
    ids: UserIds,
) -> Result<ComposeCommand, DispatchError> {
    validate_directory(directory)?;
    let bootstrap_file = settings
        .templates
        .staged_path(BOOTSTRAP_COMPOSE, &settings.project_dir)?;
    Ok(bootstrap_command(
        &settings.compose,
        &bootstrap_file,
        &settings.services.init,
        &settings.project_dir,
        directory,
        ids,
    ))
}

/// Scaffold `directory` under the project directory.
///
/// The init service runs with inherited streams so the scaffolding wizard can
/// prompt. Template files are copied only after it exits successfully and
/// the directory exists.
pub fn init_project<R: CommandRunner + ?Sized>(
    settings: &Settings,
    runner: &R,
    directory: &str,
    ids: UserIds,
) -> Result<InitResult, DispatchError> {
    validate_directory(directory)?;

    let parent_dir = &settings.project_dir;
    let staged = settings.templates.stage(BOOTSTRAP_COMPOSE, parent_dir)?;
    let command = bootstrap_command(
        &settings.compose,
        staged.path(),
        &settings.services.init,
        parent_dir,
        directory,
        ids,
    );

    tracing::info!(directory, "running init service");
    let outcome = runner.run(&command)?;
    drop(staged);
    if !outcome.success {
        return Err(DispatchError::CommandFailed {
            command: command.display(),
            code: outcome.code,
        });
    }

    let project_dir = parent_dir.join(directory);
    if !project_dir.is_dir() {
        return Err(DispatchError::ProjectDirectoryMissing { path: project_dir });
    }

    let report = copy_templates(&settings.templates, INIT_FILES, &project_dir)?;
    Ok(InitResult {
        project_dir,
        report,
    })
}
