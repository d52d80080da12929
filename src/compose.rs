//! Docker Compose command lines.
//!
//! A `ComposeCommand` is a plain value: the compose binary, the compose file
//! passed with `-f`, the routed arguments, and an optional environment
//! overlay. Runners turn it into a child process; `display()` renders the
//! same command as a copy/pasteable shell line for diagnostics.

use anyhow::{Result, bail};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::runner::CommandRunner;
use crate::util::{shell_join, shell_quote};

/// The compose executable, e.g. `docker compose` (CLI plugin) or
/// `docker-compose` (standalone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeBinary {
    program: String,
    leading_args: Vec<String>,
}

impl ComposeBinary {
    /// `docker compose`
    pub fn plugin() -> Self {
        Self {
            program: "docker".to_string(),
            leading_args: vec!["compose".to_string()],
        }
    }

    /// `docker-compose`
    pub fn standalone() -> Self {
        Self {
            program: "docker-compose".to_string(),
            leading_args: Vec::new(),
        }
    }

    /// Parse a whitespace separated command such as `"podman compose"`.
    pub fn parse(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let Some(program) = words.next() else {
            bail!("Compose command must not be empty");
        };
        Ok(Self {
            program,
            leading_args: words.collect(),
        })
    }

    /// Prefer the `docker compose` plugin, fall back to `docker-compose`.
    pub fn detect<R: CommandRunner + ?Sized>(runner: &R) -> Self {
        if runner.probe("docker", &["compose", "version"]) {
            tracing::debug!("using docker compose plugin");
            Self::plugin()
        } else {
            tracing::debug!("docker compose plugin unavailable, using docker-compose");
            Self::standalone()
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn leading_args(&self) -> &[String] {
        &self.leading_args
    }
}

impl fmt::Display for ComposeBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.leading_args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// One invocation of the compose binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeCommand {
    pub binary: ComposeBinary,
    pub file: PathBuf,
    pub args: Vec<String>,
    /// Variables added on top of the inherited environment.
    pub env: Vec<(String, String)>,
    pub current_dir: Option<PathBuf>,
}

impl ComposeCommand {
    pub fn new(binary: ComposeBinary, file: impl Into<PathBuf>) -> Self {
        Self {
            binary,
            file: file.into(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &str {
        self.binary.program()
    }

    /// Arguments passed to the program: leading binary args, `-f <file>`,
    /// then the routed arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = self.binary.leading_args().to_vec();
        argv.push("-f".to_string());
        argv.push(self.file.to_string_lossy().into_owned());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// The command as a shell line, environment overlay first.
    pub fn display(&self) -> String {
        let env = self
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, shell_quote(v)));
        let words = std::iter::once(self.program().to_string()).chain(self.argv());
        env.chain(std::iter::once(shell_join(words)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ComposeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
