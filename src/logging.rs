//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with the output of proxied commands.
//! `NUXI_DOCKER_LOG` takes an `EnvFilter` directive; `--verbose` raises the
//! default from `warn` to `debug`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NUXI_DOCKER_LOG";

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "nuxi_docker=debug" } else { "warn" }
}

pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();

    if let Err(e) = result {
        eprintln!("Log system initialization failed: {e}");
    }
}
