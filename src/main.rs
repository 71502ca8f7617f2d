use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_utils::cli::{orchestration, Cli};
use git_utils::ui;

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = orchestration::run(cli) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
