mod cli;
mod infra;
mod jump;
mod logging;
mod shared;

use clap::Parser;
use cli::{Cli, Settings};
use shared::config::{self, Config};
use shared::env_var::EnvVars;

fn main() {
    // Usage errors exit non-zero here, before anything else happens.
    let cli = Cli::parse();

    let config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e:#}; using defaults");
        Config::default()
    });
    let settings = Settings::resolve(cli, config);

    let env = EnvVars::load();
    let subscriber = logging::build_subscriber(settings.log.as_deref(), env.log_filter.as_deref());

    // Past argument parsing the tool always exits 0: it runs as a viewer
    // callback and must never break the caller.
    tracing::subscriber::with_default(subscriber, || {
        let request = &settings.request;
        tracing::debug!(
            "START with LINE_NR={}, TEXFILE={}",
            request.line_number,
            request.file.display()
        );

        if let Err(e) = jump::run(request) {
            tracing::error!("Could not jump to intended target: {e:#}");
        }

        tracing::debug!("DONE");
    });
}
