//! Bootstrap commands: `install` and `init`.

use console::style;
use std::path::Path;

use nuxi_docker::config::{EnvSnapshot, Settings};
use nuxi_docker::errors::DispatchError;
use nuxi_docker::init::{UserIds, init_project, install, preview_init};
use nuxi_docker::ui::icons::{CHECK, CONTAINER, SPARKLE};
use nuxi_docker::ui::{BIN, print_copy_report};

pub fn cmd_install(project_dir: &Path) -> Result<(), DispatchError> {
    let env = EnvSnapshot::from_process();
    let templates = Settings::template_source(project_dir, &env)?;

    let report = install(project_dir, &templates)?;

    println!("{}Added the docker setup:", CHECK);
    print_copy_report(&report, project_dir);
    println!();
    println!("Next steps:");
    println!("  1. Review .env (database credentials live there)");
    println!("  2. Run `{} up -d` to start the containers", BIN);
    println!("  3. Run `{} dev` to start the dev site", BIN);
    Ok(())
}

pub fn cmd_init(project_dir: &Path, directory: &str, dry_run: bool) -> Result<(), DispatchError> {
    let env = EnvSnapshot::from_process();
    let runner = super::runner(dry_run);
    let settings = Settings::resolve(project_dir, &env, runner.as_ref())?;
    let ids = UserIds::current();

    if dry_run {
        let command = preview_init(&settings, directory, ids)?;
        println!("{}", command.display());
        return Ok(());
    }

    println!(
        "{}Scaffolding {} with the {} service...",
        CONTAINER,
        style(directory).bold(),
        settings.services.init
    );
    let result = init_project(&settings, runner.as_ref(), directory, ids)?;

    println!();
    println!("{}init complete!", SPARKLE);
    print_copy_report(&result.report, &settings.project_dir);
    println!();
    println!("Next steps:");
    println!("  cd {}", directory);
    println!("  {} up -d", BIN);
    println!("  {} dev", BIN);
    Ok(())
}
