//! Behaviour-driven step definitions driving the solve and emit scenarios.

use super::helpers::{SAMPLE_CATALOG, StubSolverBuilder, utf8_tempdir, write_utf8};
use super::*;
use crate::solve::{run_emit_with, run_solve_with};
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;
use trailpick_core::test_support::ScriptedSolver;
use trailpick_core::{SelectionError, SolverError};

struct SolveWorld {
    _tmp: TempDir,
    catalog_path: Utf8PathBuf,
    model_path: Utf8PathBuf,
    builder: RefCell<Option<StubSolverBuilder>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SolveWorld {
    fn new() -> Self {
        let (tmp, root) = utf8_tempdir();
        Self {
            _tmp: tmp,
            catalog_path: root.join("trails.csv"),
            model_path: root.join("out").join("trails.lp"),
            builder: RefCell::new(None),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self, command: &str, extra: &str) -> Vec<String> {
        let mut argv = vec!["trailpick".to_owned(), command.to_owned()];
        argv.extend([
            format!("--{ARG_TRAILS}"),
            self.catalog_path.to_string(),
            format!("--{ARG_MODEL_OUT}"),
            self.model_path.to_string(),
        ]);
        argv.extend(extra.split_whitespace().map(str::to_owned));
        argv
    }

    fn report(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn model_text(&self) -> String {
        fs::read_to_string(self.model_path.as_std_path()).expect("model file written")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> SolveWorld {
    SolveWorld::new()
}

#[given("the sample catalog exists on disk")]
fn sample_catalog_exists(#[from(world)] world: &SolveWorld) {
    write_utf8(&world.catalog_path, SAMPLE_CATALOG.as_bytes());
}

#[given("the solver picks trails {first} and {second} with objective {objective}")]
fn solver_picks(#[from(world)] world: &SolveWorld, first: usize, second: usize, objective: f64) {
    let picked = [format!("x_{first}"), format!("x_{second}")];
    let values: Vec<(&str, f64)> = picked.iter().map(|name| (name.as_str(), 1.0)).collect();
    world.builder.replace(Some(StubSolverBuilder::new(
        ScriptedSolver::optimal(objective, &values),
    )));
}

#[given("a stale model file from an earlier run")]
fn stale_model_file(#[from(world)] world: &SolveWorld) {
    if let Some(parent) = world.model_path.parent() {
        fs::create_dir_all(parent.as_std_path()).expect("create model directory");
    }
    write_utf8(&world.model_path, b"stale model\n");
}

#[given("the solver cannot be launched")]
fn solver_cannot_launch(#[from(world)] world: &SolveWorld) {
    let failure = SolverError::Launch {
        program: "lp_solve".to_owned(),
        message: "No such file or directory".to_owned(),
    };
    world
        .builder
        .replace(Some(StubSolverBuilder::new(ScriptedSolver::new(Err(failure)))));
}

#[when("I run the {command} command with arguments \"{extra}\"")]
fn run_command(#[from(world)] world: &SolveWorld, command: String, extra: String) {
    let invocation = world.build_command_line(&command, &extra);
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| {
        let mut buffer = world.stdout.borrow_mut();
        match cli.command {
            Command::Solve(args) => {
                let builder = world.builder.borrow();
                let builder = builder.as_ref().expect("solver scripted");
                run_solve_with(args, builder, &mut *buffer)
            }
            Command::Emit(args) => run_emit_with(args, &mut *buffer),
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &SolveWorld) {
    let borrowed = world.result.borrow();
    if let Err(err) = borrowed.as_ref().expect("result recorded") {
        panic!("expected success, found {err:?}");
    }
}

#[then("the report shows objective {objective}")]
fn report_shows_objective(#[from(world)] world: &SolveWorld, objective: String) {
    let report = world.report();
    assert!(
        report.lines().any(|line| line == format!("objective: {objective}")),
        "report was:\n{report}"
    );
}

#[then("the report lists \"{line}\"")]
fn report_lists(#[from(world)] world: &SolveWorld, line: String) {
    let report = world.report();
    assert!(
        report.lines().any(|candidate| candidate == line),
        "report was:\n{report}"
    );
}

#[then("the report says the problem is infeasible")]
fn report_infeasible(#[from(world)] world: &SolveWorld) {
    let report = world.report();
    assert_eq!(report.lines().last(), Some("the problem appears infeasible."));
}

#[then("the report shows {variables} variables and {constraints} constraints")]
fn report_shows_model_size(
    #[from(world)] world: &SolveWorld,
    variables: usize,
    constraints: usize,
) {
    let report = world.report();
    let expected = format!(
        "model: {variables} variables, {constraints} constraints written to {}",
        world.model_path
    );
    assert!(
        report.lines().any(|line| line == expected),
        "report was:\n{report}"
    );
}

#[then("the model file starts with \"{prefix}\"")]
fn model_starts_with(#[from(world)] world: &SolveWorld, prefix: String) {
    assert!(world.model_text().starts_with(&prefix));
}

#[then("the model file declares binaries \"{line}\"")]
fn model_declares_binaries(#[from(world)] world: &SolveWorld, line: String) {
    assert_eq!(world.model_text().lines().last(), Some(line.as_str()));
}

#[then("the solver was not invoked")]
fn solver_not_invoked(#[from(world)] world: &SolveWorld) {
    let builder = world.builder.borrow();
    let builder = builder.as_ref().expect("solver scripted");
    assert_eq!(builder.solver.calls(), 0);
}

#[then("the command fails because the objective is unknown")]
fn fails_unknown_objective(#[from(world)] world: &SolveWorld) {
    match &*world.error() {
        CliError::InvalidObjective(_) => {}
        other => panic!("expected InvalidObjective, found {other:?}"),
    }
}

#[then("the command fails because the catalog is missing")]
fn fails_missing_catalog(#[from(world)] world: &SolveWorld) {
    match &*world.error() {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_TRAILS),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[then("the command fails because the solver could not start")]
fn fails_solver_launch(#[from(world)] world: &SolveWorld) {
    match &*world.error() {
        CliError::Select(SelectionError::Solver(SolverError::Launch { program, .. })) => {
            assert_eq!(program, "lp_solve");
        }
        other => panic!("expected a solver launch failure, found {other:?}"),
    }
}

#[then("no model file exists")]
fn no_model_file(#[from(world)] world: &SolveWorld) {
    assert!(!world.model_path.exists(), "unexpected model at {}", world.model_path);
}

macro_rules! register_solve_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/solve_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SolveWorld) {
            let _ = world;
        }
    };
}

register_solve_scenario!(solve_prints_selection, "solving a catalog prints the selected trails");
register_solve_scenario!(solve_oversized_count, "requesting more trails than are eligible");
register_solve_scenario!(solve_unknown_objective, "rejecting an unknown objective");
register_solve_scenario!(solve_missing_catalog, "rejecting a missing catalog");
register_solve_scenario!(emit_writes_model, "emitting a model without solving");
register_solve_scenario!(
    solve_failure_keeps_model,
    "a failing solver still leaves this run's model on disk"
);
register_solve_scenario!(
    emit_without_eligible_trails,
    "emitting with no eligible trails writes no model"
);
