//! CLI entry point for scry.

mod cli;

use clap::Parser;
use scry::config::{load_config, validate};
use scry::logging::init_tracing;
use scry::repl::Repl;

fn main() {
    let args = cli::Args::parse();

    // Load config.
    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Apply CLI overrides.
    args.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let _log_guard = init_tracing(config.log.debug, &config.log.file);
    tracing::debug!(group = %config.tmux.group, "starting");

    let mut repl = Repl::new(config);
    if let Err(e) = repl.run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
