//! Template files copied into projects by `install` and `init`.
//!
//! The templates ship inside the binary. A directory override reads them
//! from disk instead, which makes it possible to customise the generated
//! compose setup without rebuilding.
//!
//! Files are copied byte for byte; no substitution happens inside them.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::errors::DispatchError;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct Bundled;

/// Compose definition used by the bootstrap `init` flow only.
pub const BOOTSTRAP_COMPOSE: &str = "docker-compose.init.yml";

/// Name used when the bundled bootstrap definition is staged on disk.
pub const STAGED_BOOTSTRAP: &str = ".nuxi-docker.init.yml";

/// What to do when the destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Abort the whole copy before writing anything.
    RequireAbsent,
    /// Leave the existing file alone and report it.
    SkipIfPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFile {
    /// Name inside the template source.
    pub source: &'static str,
    /// Name in the destination directory.
    pub destination: &'static str,
    pub policy: CopyPolicy,
}

pub const COMPOSE: &str = "docker-compose.yml";
pub const DOCKERFILE: &str = "Dockerfile";
/// Stored without the leading dot so it is never treated as hidden.
pub const ENV_TEMPLATE: &str = "env.example";

/// Files written by `install` into the working directory.
pub const INSTALL_FILES: &[TemplateFile] = &[
    TemplateFile {
        source: COMPOSE,
        destination: COMPOSE,
        policy: CopyPolicy::RequireAbsent,
    },
    TemplateFile {
        source: DOCKERFILE,
        destination: DOCKERFILE,
        policy: CopyPolicy::SkipIfPresent,
    },
    TemplateFile {
        source: ENV_TEMPLATE,
        destination: ".env",
        policy: CopyPolicy::SkipIfPresent,
    },
];

/// Files written by `init` into the freshly scaffolded project.
pub const INIT_FILES: &[TemplateFile] = &[
    TemplateFile {
        source: COMPOSE,
        destination: COMPOSE,
        policy: CopyPolicy::SkipIfPresent,
    },
    TemplateFile {
        source: DOCKERFILE,
        destination: DOCKERFILE,
        policy: CopyPolicy::SkipIfPresent,
    },
    TemplateFile {
        source: ENV_TEMPLATE,
        destination: ".env",
        policy: CopyPolicy::SkipIfPresent,
    },
];

/// Where template files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Bundled,
    Directory(PathBuf),
}

impl TemplateSource {
    pub fn describe(&self) -> String {
        match self {
            TemplateSource::Bundled => "bundled templates".to_string(),
            TemplateSource::Directory(dir) => dir.display().to_string(),
        }
    }

    fn missing(&self, name: &str) -> DispatchError {
        DispatchError::TemplateMissing {
            name: name.to_string(),
            location: self.describe(),
        }
    }

    /// Contents of the template `name`.
    pub fn read(&self, name: &str) -> Result<Cow<'static, [u8]>, DispatchError> {
        match self {
            TemplateSource::Bundled => Bundled::get(name)
                .map(|file| file.data)
                .ok_or_else(|| self.missing(name)),
            TemplateSource::Directory(dir) => {
                let path = dir.join(name);
                if !path.is_file() {
                    return Err(self.missing(name));
                }
                std::fs::read(&path)
                    .map(Cow::Owned)
                    .map_err(|e| DispatchError::io(path, e))
            }
        }
    }

    /// Where `stage` puts the template `name`, checked but not written.
    pub fn staged_path(&self, name: &str, staging_dir: &Path) -> Result<PathBuf, DispatchError> {
        match self {
            TemplateSource::Directory(dir) => {
                let path = dir.join(name);
                if !path.is_file() {
                    return Err(self.missing(name));
                }
                Ok(path)
            }
            TemplateSource::Bundled => {
                if Bundled::get(name).is_none() {
                    return Err(self.missing(name));
                }
                Ok(staging_dir.join(STAGED_BOOTSTRAP))
            }
        }
    }

    /// Make the template `name` available as a file compose can read.
    ///
    /// Directory templates are used in place. Bundled templates are written
    /// to `STAGED_BOOTSTRAP` inside `staging_dir` and removed when the
    /// returned guard drops.
    pub fn stage(&self, name: &str, staging_dir: &Path) -> Result<StagedFile, DispatchError> {
        let path = self.staged_path(name, staging_dir)?;
        let remove_on_drop = match self {
            TemplateSource::Directory(_) => false,
            TemplateSource::Bundled => {
                let data = self.read(name)?;
                std::fs::write(&path, &data).map_err(|e| DispatchError::io(&path, e))?;
                tracing::debug!(path = %path.display(), "staged bundled template");
                true
            }
        };
        Ok(StagedFile {
            path,
            remove_on_drop,
        })
    }
}

/// A template file on disk for the duration of one command.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    remove_on_drop: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.remove_on_drop {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove staged file");
            }
        }
    }
}

/// Files written and files left alone by a copy.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Copy `files` from `source` into `destination`.
///
/// All `RequireAbsent` files are checked before the first write, so a
/// conflict leaves the destination untouched.
pub fn copy_templates(
    source: &TemplateSource,
    files: &[TemplateFile],
    destination: &Path,
) -> Result<CopyReport, DispatchError> {
    for file in files
        .iter()
        .filter(|f| f.policy == CopyPolicy::RequireAbsent)
    {
        let target = destination.join(file.destination);
        if target.exists() {
            return Err(DispatchError::ComposeFileExists { path: target });
        }
    }

    let mut report = CopyReport::default();
    for file in files {
        let target = destination.join(file.destination);
        if target.exists() {
            tracing::debug!(path = %target.display(), "exists, skipping");
            report.skipped.push(target);
            continue;
        }
        let data = source.read(file.source)?;
        std::fs::write(&target, &data).map_err(|e| DispatchError::io(&target, e))?;
        tracing::debug!(path = %target.display(), bytes = data.len(), "copied template");
        report.copied.push(target);
    }
    Ok(report)
}
