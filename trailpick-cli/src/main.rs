//! Entry point for the `trailpick` binary.
#![forbid(unsafe_code)]

use std::error::Error;

use trailpick_cli::{CliError, run};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    match run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("trailpick: {err}");
            let mut cause = err.source();
            while let Some(source) = cause {
                eprintln!("  caused by: {source}");
                cause = source.source();
            }
            std::process::exit(1);
        }
    }
}

/// Install the fmt subscriber; `log` records are forwarded to it.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
