//! Command-line interface for selecting trails with an external MILP solver.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod solve;

pub use error::CliError;

use solve::{SolveArgs, run_emit, run_solve};

const ARG_COUNT: &str = "count";
const ARG_MAX_DISTANCE: &str = "max-distance";
const ARG_ELEV_MIN: &str = "elev-min";
const ARG_ELEV_MAX: &str = "elev-max";
const ARG_SINGLE_ELEV_MIN: &str = "single-elev-min";
const ARG_SINGLE_ELEV_MAX: &str = "single-elev-max";
const ARG_SINGLE_LENGTH_MAX: &str = "single-length-max";
const ARG_MIN_NUM_RATINGS: &str = "min-num-ratings";
const ARG_MIN_TRAIL_DIST: &str = "min-trail-dist";
const ARG_OBJ: &str = "obj";
const ARG_START_LAT: &str = "start-lat";
const ARG_START_LNG: &str = "start-lng";
const ARG_BIG_M: &str = "big-m";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_TRAILS: &str = "trails";
const ARG_MODEL_OUT: &str = "model-out";
const ARG_LP_SOLVE: &str = "lp-solve";

/// Catalog read when `--trails` is not given.
const DEFAULT_TRAILS_FILE: &str = "trails_with_ratings.csv";
/// Model file written when `--model-out` is not given.
const DEFAULT_MODEL_FILE: &str = "trails.lp";

/// Run the trailpick CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => run_solve(args),
        Command::Emit(args) => run_emit(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "trailpick",
    about = "Pick a set of hiking trails by solving an integer program",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the model, run `lp_solve` and print the selected trails.
    Solve(SolveArgs),
    /// Write the model file without solving it.
    Emit(SolveArgs),
}

#[cfg(test)]
mod tests;
