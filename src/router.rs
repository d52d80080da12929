//! The command router.
//!
//! Turns a planned `Target` into exactly one compose invocation and runs it.
//! Help and the bootstrap flows (`install`, `init`) never reach the router.

use crate::compose::ComposeCommand;
use crate::config::{EnvSnapshot, Settings};
use crate::errors::DispatchError;
use crate::routes::{Service, Target};
use crate::runner::CommandRunner;
use crate::util::shell_quote;

/// Variables interpolated into the psql one-liner.
pub const POSTGRES_USER: &str = "POSTGRES_USER";
pub const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";
pub const POSTGRES_DATABASE: &str = "POSTGRES_DATABASE";

pub struct Router<'a, R: CommandRunner + ?Sized> {
    settings: &'a Settings,
    env: &'a EnvSnapshot,
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> Router<'a, R> {
    pub fn new(settings: &'a Settings, env: &'a EnvSnapshot, runner: &'a R) -> Self {
        Self {
            settings,
            env,
            runner,
        }
    }

    /// Check preconditions, build the command for `target`, and run it.
    pub fn execute(&self, target: &Target) -> Result<ComposeCommand, DispatchError> {
        self.ensure_compose_file()?;
        if target.requires_liveness() {
            self.ensure_running()?;
        }

        let command = self.build(target)?;
        let outcome = self.runner.run(&command)?;
        if !outcome.success {
            return Err(DispatchError::CommandFailed {
                command: command.display(),
                code: outcome.code,
            });
        }
        Ok(command)
    }

    /// The compose command for `target`, without running it.
    pub fn build(&self, target: &Target) -> Result<ComposeCommand, DispatchError> {
        let base = self.base_command();
        let command = match target {
            Target::Exec { service, command } => base
                .arg("exec")
                .arg(self.service_name(*service))
                .args(command.iter().cloned()),
            Target::DatabaseClient { extra } => base
                .arg("exec")
                .arg(self.service_name(Service::Database))
                .args(["bash", "-c"])
                .arg(self.psql_line(extra)?),
            Target::Passthrough(args) => base.args(args.iter().cloned()),
        };
        Ok(command)
    }

    /// Fail unless at least one service of the environment is running.
    pub fn ensure_running(&self) -> Result<(), DispatchError> {
        let query = self.base_command().args(["ps", "-q"]);
        let ids = self.runner.capture(&query)?;
        if ids.trim().is_empty() {
            tracing::debug!("liveness check found no running services");
            return Err(DispatchError::NotRunning);
        }
        Ok(())
    }

    fn ensure_compose_file(&self) -> Result<(), DispatchError> {
        let path = self.settings.compose_path();
        if !path.is_file() {
            return Err(DispatchError::MissingComposeFile {
                path: self.settings.compose_file.clone(),
            });
        }
        Ok(())
    }

    fn base_command(&self) -> ComposeCommand {
        ComposeCommand::new(self.settings.compose.clone(), &self.settings.compose_file)
            .current_dir(&self.settings.project_dir)
    }

    fn service_name(&self, service: Service) -> &str {
        match service {
            Service::App => &self.settings.services.app,
            Service::Database => &self.settings.services.database,
        }
    }

    fn psql_line(&self, extra: &[String]) -> Result<String, DispatchError> {
        let user = self
            .env
            .get(POSTGRES_USER)
            .ok_or(DispatchError::MissingCredential {
                name: POSTGRES_USER,
            })?;
        let database = self
            .env
            .get(POSTGRES_DATABASE)
            .ok_or(DispatchError::MissingCredential {
                name: POSTGRES_DATABASE,
            })?;
        let password = self.env.get(POSTGRES_PASSWORD).unwrap_or_default();

        let mut line = format!(
            "PGPASSWORD={} psql -U {} {}",
            shell_quote(password),
            shell_quote(user),
            shell_quote(database)
        );
        for arg in extra {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        Ok(line)
    }
}
