use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use nuxi_docker::errors::{DispatchError, EXIT_PRECONDITION};
use nuxi_docker::logging::init_logging;
use nuxi_docker::routes::{Plan, plan};
use nuxi_docker::ui;

mod cmd;

#[derive(Parser)]
#[command(name = "nuxi-docker")]
#[command(
    version,
    about = "A preconfigured docker environment for nuxt projects",
    after_help = "Run `nuxi-docker help` for the list of routed commands."
)]
pub struct Cli {
    /// Log routing decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the compose command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding docker-compose.yml (defaults to the current directory)
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Command and arguments to route
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            ui::print_failure(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, DispatchError> {
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(|e| DispatchError::io(".", e))?,
    };

    let planned = plan(&cli.args);
    tracing::debug!(plan = ?planned, "planned");

    match planned {
        Plan::Usage => {
            ui::print_usage();
            return Ok(ExitCode::from(EXIT_PRECONDITION));
        }
        Plan::Help => ui::print_help(),
        Plan::Install => cmd::cmd_install(&project_dir)?,
        Plan::Init { directory } => cmd::cmd_init(&project_dir, &directory, cli.dry_run)?,
        Plan::Compose(target) => cmd::cmd_compose(&project_dir, &target, cli.dry_run)?,
    }

    Ok(ExitCode::SUCCESS)
}
