//! Runtime configuration.
//!
//! Settings are resolved once per invocation and threaded into the router as
//! a single immutable value. Layers, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. `nuxi-docker.toml` in the project directory
//! 3. environment (`NUXI_DOCKER_COMPOSE`, `NUXI_DOCKER_TEMPLATES`)
//! 4. command-line flags
//!
//! ```toml
//! templates = "./docker"
//!
//! [compose]
//! command = "docker compose"
//! file = "docker-compose.yml"
//!
//! [services]
//! app = "nuxt-app"
//! database = "postgres"
//! init = "nuxt-app-init"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::compose::ComposeBinary;
use crate::runner::CommandRunner;
use crate::templates::TemplateSource;

pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const ENV_FILE: &str = ".env";
pub const CONFIG_FILE: &str = "nuxi-docker.toml";

pub const APP_SERVICE: &str = "nuxt-app";
pub const DATABASE_SERVICE: &str = "postgres";
pub const INIT_SERVICE: &str = "nuxt-app-init";

/// Overrides compose binary detection, e.g. `docker-compose`.
pub const COMPOSE_ENV: &str = "NUXI_DOCKER_COMPOSE";
/// Reads templates from this directory instead of the bundled copies.
pub const TEMPLATES_ENV: &str = "NUXI_DOCKER_TEMPLATES";

/// Environment variables visible to this invocation.
///
/// Built from the process environment, optionally underlaid with a `.env`
/// file. Values already present in the process environment win, matching
/// dotenv semantics. The process environment itself is never modified.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Process environment plus `<project_dir>/.env` when it exists.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let mut snapshot = Self::from_process();
        let env_file = project_dir.join(ENV_FILE);
        if !env_file.exists() {
            tracing::debug!(path = %env_file.display(), "no .env file");
            return Ok(snapshot);
        }

        let entries = dotenvy::from_path_iter(&env_file)
            .with_context(|| format!("Failed to read {}", env_file.display()))?;
        let mut loaded = 0usize;
        for entry in entries {
            let (key, value) =
                entry.with_context(|| format!("Failed to parse {}", env_file.display()))?;
            if !snapshot.vars.contains_key(&key) {
                snapshot.vars.insert(key, value);
                loaded += 1;
            }
        }
        tracing::debug!(path = %env_file.display(), loaded, "loaded .env");
        Ok(snapshot)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Non-empty value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Raw TOML structure for `nuxi-docker.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolToml {
    pub templates: Option<PathBuf>,
    pub compose: ComposeSection,
    pub services: ServicesSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeSection {
    pub command: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServicesSection {
    pub app: Option<String>,
    pub database: Option<String>,
    pub init: Option<String>,
}

impl ToolToml {
    /// Load `nuxi-docker.toml` from the project directory, defaults if absent.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Compose service names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Services {
    /// Hosts the project and its CLIs.
    pub app: String,
    /// Runs postgres and its client tools.
    pub database: String,
    /// One-shot scaffolding service in the bootstrap compose file.
    pub init: String,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            app: APP_SERVICE.to_string(),
            database: DATABASE_SERVICE.to_string(),
            init: INIT_SERVICE.to_string(),
        }
    }
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Absolute directory holding the compose file; children run here.
    pub project_dir: PathBuf,
    pub compose: ComposeBinary,
    /// Compose file name, relative to `project_dir`.
    pub compose_file: PathBuf,
    pub services: Services,
    pub templates: TemplateSource,
}

impl Settings {
    /// Resolve all layers. Probes for the compose binary through `runner`
    /// only when no layer names one.
    pub fn resolve<R: CommandRunner + ?Sized>(
        project_dir: &Path,
        env: &EnvSnapshot,
        runner: &R,
    ) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve project directory {}", project_dir.display()))?;
        let toml = ToolToml::load(&project_dir)?;

        let compose = match env.get(COMPOSE_ENV).or(toml.compose.command.as_deref()) {
            Some(command) => ComposeBinary::parse(command)
                .with_context(|| format!("Invalid compose command '{}'", command))?,
            None => ComposeBinary::detect(runner),
        };

        let defaults = Services::default();
        let services = Services {
            app: toml.services.app.unwrap_or(defaults.app),
            database: toml.services.database.unwrap_or(defaults.database),
            init: toml.services.init.unwrap_or(defaults.init),
        };

        let templates = templates_layer(&project_dir, env, toml.templates);

        let compose_file = toml
            .compose
            .file
            .unwrap_or_else(|| PathBuf::from(COMPOSE_FILE));

        tracing::debug!(
            project_dir = %project_dir.display(),
            compose = %compose,
            compose_file = %compose_file.display(),
            templates = %templates.describe(),
            "resolved settings"
        );

        Ok(Self {
            project_dir,
            compose,
            compose_file,
            services,
            templates,
        })
    }

    /// Only the template source, for flows that never talk to compose.
    pub fn template_source(project_dir: &Path, env: &EnvSnapshot) -> Result<TemplateSource> {
        let toml = ToolToml::load(project_dir)?;
        Ok(templates_layer(project_dir, env, toml.templates))
    }

    /// Absolute path of the compose file.
    pub fn compose_path(&self) -> PathBuf {
        self.project_dir.join(&self.compose_file)
    }
}

fn templates_layer(project_dir: &Path, env: &EnvSnapshot, file: Option<PathBuf>) -> TemplateSource {
    match env.get(TEMPLATES_ENV).map(PathBuf::from).or(file) {
        Some(dir) if dir.is_absolute() => TemplateSource::Directory(dir),
        Some(dir) => TemplateSource::Directory(project_dir.join(dir)),
        None => TemplateSource::Bundled,
    }
}
