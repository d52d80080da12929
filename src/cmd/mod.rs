//! CLI command implementations.
//!
//! Each submodule owns one or more `Plan` variants:
//!
//! | Module    | Plans handled                  |
//! |-----------|--------------------------------|
//! | `project` | `Install`, `Init`              |
//! | `route`   | `Compose`                      |
//!
//! `Usage` and `Help` only print text and are handled in `main`.

pub mod project;
pub mod route;

pub use project::{cmd_init, cmd_install};
pub use route::cmd_compose;

use nuxi_docker::runner::{CommandRunner, DryRunRunner, SystemRunner};

/// The runner for this invocation.
pub fn runner(dry_run: bool) -> Box<dyn CommandRunner> {
    if dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemRunner)
    }
}
