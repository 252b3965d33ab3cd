//! `solve` and `emit` command implementation.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use trailpick_core::{
    MilpSolver, ModelParameters, ObjectiveMode, PreparedSelection, SelectionConfig, SelectionRun,
    TrailFilter, prepare_selection,
};
use trailpick_data::{CatalogLoad, load_catalog, write_model_file};
use trailpick_solver_lpsolve::{LpSolveConfig, LpSolveSolver};

use crate::{
    ARG_BIG_M, ARG_COUNT, ARG_ELEV_MAX, ARG_ELEV_MIN, ARG_LP_SOLVE, ARG_MAX_DISTANCE,
    ARG_MIN_NUM_RATINGS, ARG_MIN_TRAIL_DIST, ARG_MODEL_OUT, ARG_OBJ, ARG_SINGLE_ELEV_MAX,
    ARG_SINGLE_ELEV_MIN, ARG_SINGLE_LENGTH_MAX, ARG_START_LAT, ARG_START_LNG, ARG_TIMEOUT_SECS,
    ARG_TRAILS, CliError, DEFAULT_MODEL_FILE, DEFAULT_TRAILS_FILE,
};

const MODEL_NOT_WRITTEN: &str = "model: not written, no eligible trails";

/// CLI arguments shared by the `solve` and `emit` subcommands.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Filter a CSV trail catalog, write the selection problem as an \
                 lp_solve model and, for `solve`, run lp_solve and print the \
                 chosen trails. Options can come from CLI flags, configuration \
                 files, or TRAILPICK_ environment variables.",
    about = "Select trails from a catalog"
)]
#[ortho_config(prefix = "TRAILPICK")]
pub(crate) struct SolveArgs {
    /// Number of trails to select.
    #[arg(short = 'n', long = ARG_COUNT, value_name = "n")]
    #[serde(default)]
    pub(crate) count: Option<u32>,
    /// Maximum distance in miles from the start point to any trail.
    #[arg(short = 'd', long = ARG_MAX_DISTANCE, value_name = "miles")]
    #[serde(default)]
    pub(crate) max_distance: Option<f64>,
    /// Minimum total elevation gain of the selection, in feet.
    #[arg(long = ARG_ELEV_MIN, value_name = "feet")]
    #[serde(default)]
    pub(crate) elev_min: Option<f64>,
    /// Maximum total elevation gain of the selection, in feet.
    #[arg(long = ARG_ELEV_MAX, value_name = "feet")]
    #[serde(default)]
    pub(crate) elev_max: Option<f64>,
    /// Minimum elevation gain of any single trail, in feet.
    #[arg(long = ARG_SINGLE_ELEV_MIN, value_name = "feet")]
    #[serde(default)]
    pub(crate) single_elev_min: Option<f64>,
    /// Maximum elevation gain of any single trail, in feet.
    #[arg(long = ARG_SINGLE_ELEV_MAX, value_name = "feet")]
    #[serde(default)]
    pub(crate) single_elev_max: Option<f64>,
    /// Maximum length of any single trail, in miles.
    #[arg(long = ARG_SINGLE_LENGTH_MAX, value_name = "miles")]
    #[serde(default)]
    pub(crate) single_length_max: Option<f64>,
    /// Minimum number of ratings a trail needs.
    #[arg(long = ARG_MIN_NUM_RATINGS, value_name = "n")]
    #[serde(default)]
    pub(crate) min_num_ratings: Option<u32>,
    /// Minimum distance in miles between any two selected trails (0 disables).
    #[arg(long = ARG_MIN_TRAIL_DIST, value_name = "miles")]
    #[serde(default)]
    pub(crate) min_trail_dist: Option<f64>,
    /// Objective: 0 popularity, 1 quality, 2 weighted-popularity, 3 quality-emphasis.
    #[arg(long = ARG_OBJ, value_name = "mode")]
    #[serde(default)]
    pub(crate) obj: Option<String>,
    /// Latitude of the start point, in degrees.
    #[arg(long = ARG_START_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) start_lat: Option<f64>,
    /// Longitude of the start point, in degrees.
    #[arg(long = ARG_START_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) start_lng: Option<f64>,
    /// Relaxation constant for the separation constraints.
    #[arg(long = ARG_BIG_M, value_name = "value")]
    #[serde(default)]
    pub(crate) big_m: Option<f64>,
    /// Solver time limit in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Path to the CSV trail catalog.
    #[arg(long = ARG_TRAILS, value_name = "path")]
    #[serde(default)]
    pub(crate) trails: Option<Utf8PathBuf>,
    /// Where to write the generated model.
    #[arg(long = ARG_MODEL_OUT, value_name = "path")]
    #[serde(default)]
    pub(crate) model_out: Option<Utf8PathBuf>,
    /// The `lp_solve` executable.
    #[arg(long = ARG_LP_SOLVE, value_name = "program")]
    #[serde(default)]
    pub(crate) lp_solve: Option<Utf8PathBuf>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved configuration for `solve` and `emit`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SolveConfig {
    /// CSV trail catalog.
    pub(crate) trails: Utf8PathBuf,
    /// Model file destination.
    pub(crate) model_out: Utf8PathBuf,
    /// `lp_solve` executable.
    pub(crate) lp_solve: Utf8PathBuf,
    /// Filter, model parameters and time budget.
    pub(crate) selection: SelectionConfig,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if self.trails.is_file() {
            Ok(())
        } else {
            Err(CliError::MissingSourceFile {
                field: ARG_TRAILS,
                path: self.trails.clone(),
            })
        }
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let defaults = SelectionConfig::default();

        let objective = args
            .obj
            .as_deref()
            .map(str::parse::<ObjectiveMode>)
            .transpose()?
            .unwrap_or(defaults.model.objective);
        let timeout = match args.timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    reason: "the time limit must be at least one second",
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };

        let filter = TrailFilter {
            min_rating_count: args
                .min_num_ratings
                .unwrap_or(defaults.filter.min_rating_count),
            min_elevation_gain: args
                .single_elev_min
                .unwrap_or(defaults.filter.min_elevation_gain),
            max_elevation_gain: args
                .single_elev_max
                .unwrap_or(defaults.filter.max_elevation_gain),
            max_length: args
                .single_length_max
                .unwrap_or(defaults.filter.max_length),
            max_distance_from_origin: args
                .max_distance
                .unwrap_or(defaults.filter.max_distance_from_origin),
            origin: Coord {
                x: args.start_lng.unwrap_or(defaults.filter.origin.x),
                y: args.start_lat.unwrap_or(defaults.filter.origin.y),
            },
        };
        let model = ModelParameters {
            target_count: args.count.unwrap_or(defaults.model.target_count),
            objective,
            min_total_elevation: args
                .elev_min
                .unwrap_or(defaults.model.min_total_elevation),
            max_total_elevation: args
                .elev_max
                .unwrap_or(defaults.model.max_total_elevation),
            min_separation: args
                .min_trail_dist
                .unwrap_or(defaults.model.min_separation),
            big_m: args.big_m.unwrap_or(defaults.model.big_m),
            ..defaults.model
        };

        Ok(Self {
            trails: args
                .trails
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_TRAILS_FILE)),
            model_out: args
                .model_out
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_MODEL_FILE)),
            lp_solve: args
                .lp_solve
                .unwrap_or_else(|| LpSolveConfig::default().program),
            selection: SelectionConfig {
                filter,
                model,
                timeout,
            },
        })
    }
}

/// Effective settings, one per line.
impl fmt::Display for SolveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filter = &self.selection.filter;
        let model = &self.selection.model;
        writeln!(f, "num trails: {}", model.target_count)?;
        writeln!(
            f,
            "max distance to trails: {}",
            Bound(filter.max_distance_from_origin)
        )?;
        writeln!(f, "starting point latitude: {}", filter.origin.y)?;
        writeln!(f, "starting point longitude: {}", filter.origin.x)?;
        writeln!(f, "max length of any trail: {}", Bound(filter.max_length))?;
        writeln!(
            f,
            "max elev gain of any trail: {}",
            Bound(filter.max_elevation_gain)
        )?;
        writeln!(f, "min elev gain of any trail: {}", filter.min_elevation_gain)?;
        writeln!(
            f,
            "min total elevation of all trails: {}",
            model.min_total_elevation
        )?;
        writeln!(
            f,
            "max total elevation of all trails: {}",
            Bound(model.max_total_elevation)
        )?;
        writeln!(f, "min ratings per trail: {}", filter.min_rating_count)?;
        writeln!(f, "min distance between trails: {}", model.min_separation)?;
        write!(f, "objective function type: {}", model.objective)
    }
}

struct Bound(f64);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_infinite() {
            f.write_str("unbounded")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Builds the solver for the current invocation.
pub(crate) trait SolverBuilder {
    fn build(&self, config: &SolveConfig) -> Box<dyn MilpSolver>;
}

pub(crate) struct LpSolveBuilder;

impl SolverBuilder for LpSolveBuilder {
    fn build(&self, config: &SolveConfig) -> Box<dyn MilpSolver> {
        Box::new(LpSolveSolver::with_config(LpSolveConfig {
            program: config.lp_solve.clone(),
            ..LpSolveConfig::default()
        }))
    }
}

pub(crate) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_solve_with(args, &LpSolveBuilder, &mut stdout)
}

pub(crate) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_solve_config(args)?;
    let load = load_catalog(&config.trails)?;
    let prepared = prepare_selection(&load.trails, &config.selection)?;
    save_model(&config, &prepared)?;
    let solver = builder.build(&config);
    let run = prepared.solve(solver.as_ref(), config.selection.timeout)?;
    write_solve_report(writer, &config, &load, &run).map_err(CliError::WriteReport)
}

pub(crate) fn run_emit(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_emit_with(args, &mut stdout)
}

pub(crate) fn run_emit_with(args: SolveArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_solve_config(args)?;
    let load = load_catalog(&config.trails)?;
    let prepared = prepare_selection(&load.trails, &config.selection)?;
    save_model(&config, &prepared)?;
    write_emit_report(writer, &config, &load, &prepared).map_err(CliError::WriteReport)
}

/// Persist the LP text before any solver runs; skipped when nothing is eligible.
fn save_model(config: &SolveConfig, prepared: &PreparedSelection) -> Result<(), CliError> {
    match prepared.model_text.as_deref() {
        Some(text) => write_model_file(&config.model_out, text)?,
        None => log::warn!("no eligible trails; model file {} not written", config.model_out),
    }
    Ok(())
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn write_catalog_summary(
    writer: &mut dyn Write,
    config: &SolveConfig,
    load: &CatalogLoad,
    eligible: usize,
) -> std::io::Result<()> {
    writeln!(writer, "{config}")?;
    writeln!(
        writer,
        "catalog: {} trails loaded, {} rejected",
        load.trails.len(),
        load.rejected.len()
    )?;
    writeln!(writer, "eligible trails: {eligible}")
}

fn write_solve_report(
    writer: &mut dyn Write,
    config: &SolveConfig,
    load: &CatalogLoad,
    run: &SelectionRun,
) -> std::io::Result<()> {
    write_catalog_summary(writer, config, load, run.eligible.len())?;
    if run.model_text.is_none() {
        writeln!(writer, "{MODEL_NOT_WRITTEN}")?;
    }
    writeln!(writer, "{}", run.outcome)
}

fn write_emit_report(
    writer: &mut dyn Write,
    config: &SolveConfig,
    load: &CatalogLoad,
    prepared: &PreparedSelection,
) -> std::io::Result<()> {
    write_catalog_summary(writer, config, load, prepared.eligible.len())?;
    if prepared.model_text.is_none() {
        return writeln!(writer, "{MODEL_NOT_WRITTEN}");
    }
    writeln!(
        writer,
        "model: {} variables, {} constraints written to {}",
        prepared.model.variable_count(),
        prepared.model.constraint_count(),
        config.model_out
    )
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
