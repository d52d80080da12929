//! Routed commands: everything that ends in a single compose invocation.

use std::path::Path;

use nuxi_docker::config::{EnvSnapshot, Settings};
use nuxi_docker::errors::DispatchError;
use nuxi_docker::router::Router;
use nuxi_docker::routes::Target;

pub fn cmd_compose(project_dir: &Path, target: &Target, dry_run: bool) -> Result<(), DispatchError> {
    let env = EnvSnapshot::load(project_dir)?;
    let runner = super::runner(dry_run);
    let settings = Settings::resolve(project_dir, &env, runner.as_ref())?;

    let router = Router::new(&settings, &env, runner.as_ref());
    let command = router.execute(target)?;
    tracing::debug!(command = %command.display(), "done");
    Ok(())
}
