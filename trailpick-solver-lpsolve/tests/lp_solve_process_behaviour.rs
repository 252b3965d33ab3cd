#![cfg(unix)]
#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for `LpSolveSolver` against a scripted stand-in for
//! `lp_solve`.

use std::cell::RefCell;
use std::fs;
use std::time::Duration;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;
use trailpick_core::{MilpSolver, SolverError, SolverOutput, SolverStatus};
use trailpick_solver_lpsolve::{LpSolveConfig, LpSolveSolver};

const MODEL: &str = "max: 10*x_0 + 20*x_1;\ncount: x_0 + x_1 = 1;\nbin x_0,x_1;\n";

const OPTIMAL_REPORT: &str = "
Value of objective function: 20.00000000

Actual values of the variables:
x_0                             0
x_1                             1

Actual values of the constraints:
R1                              1
";

struct ProcessWorld {
    dir: TempDir,
    solver: RefCell<Option<LpSolveSolver>>,
    result: RefCell<Option<Result<SolverOutput, SolverError>>>,
}

impl ProcessWorld {
    fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join(name)).expect("temp path is UTF-8")
    }

    fn install_script(&self, stdout: &str, code: i32) {
        let script = format!(
            "cat > '{stdin}'\nprintf '%s ' \"$@\" > '{args}'\ncat <<'REPORT'\n{stdout}\nREPORT\nexit {code}\n",
            stdin = self.path("stdin.lp"),
            args = self.path("args.txt"),
        );
        let script_path = self.path("lp_solve.sh");
        fs::write(&script_path, script).expect("write fake lp_solve");
        self.solver
            .replace(Some(LpSolveSolver::with_config(LpSolveConfig {
                program: Utf8PathBuf::from("sh"),
                leading_args: vec![script_path.into_string()],
            })));
    }

    fn output(&self) -> SolverOutput {
        self.result
            .borrow()
            .as_ref()
            .expect("solve was attempted")
            .clone()
            .expect("solve succeeded")
    }
}

#[fixture]
fn world() -> ProcessWorld {
    ProcessWorld {
        dir: tempfile::tempdir().expect("create temp dir"),
        solver: RefCell::new(None),
        result: RefCell::new(None),
    }
}

#[given("a fake lp_solve that prints an optimal report and exits with {code}")]
fn given_optimal(world: &ProcessWorld, code: i32) {
    world.install_script(OPTIMAL_REPORT, code);
}

#[given("a fake lp_solve that prints nothing and exits with {code}")]
fn given_silent(world: &ProcessWorld, code: i32) {
    world.install_script("", code);
}

#[when("a model is solved with a {secs} second limit")]
fn when_solved(world: &ProcessWorld, secs: u64) {
    let solver = world.solver.borrow();
    let solver = solver.as_ref().expect("fake solver installed");
    world
        .result
        .replace(Some(solver.solve(MODEL, Duration::from_secs(secs))));
}

#[then("the status is optimal")]
fn then_optimal(world: &ProcessWorld) {
    let output = world.output();
    assert_eq!(output.status, SolverStatus::Optimal);
    assert_eq!(output.objective, Some(20.0));
}

#[then("the status is timeout")]
fn then_timeout(world: &ProcessWorld) {
    assert_eq!(world.output().status, SolverStatus::Timeout);
}

#[then("the status is infeasible")]
fn then_infeasible(world: &ProcessWorld) {
    assert_eq!(world.output().status, SolverStatus::Infeasible);
}

#[then("variable {name} has value {value}")]
fn then_variable(world: &ProcessWorld, name: String, value: f64) {
    let output = world.output();
    let actual = output
        .values
        .iter()
        .find(|(variable, _)| *variable == name)
        .map(|(_, v)| *v);
    assert_eq!(actual, Some(value));
}

#[then("the solver received the model on stdin")]
fn then_stdin(world: &ProcessWorld) {
    let received = fs::read_to_string(world.path("stdin.lp")).expect("captured stdin");
    assert_eq!(received, MODEL);
}

#[then("the solver was asked for a {secs} second limit")]
fn then_args(world: &ProcessWorld, secs: u64) {
    let args = fs::read_to_string(world.path("args.txt")).expect("captured args");
    assert_eq!(args.trim(), format!("-S4 -timeout {secs}"));
}

#[then("the solve fails with a solver fault")]
fn then_fault(world: &ProcessWorld) {
    assert!(matches!(
        world.result.borrow().as_ref(),
        Some(Err(SolverError::SolverFault { code: Some(3), .. }))
    ));
}

#[scenario(path = "tests/features/lp_solve_process.feature", index = 0)]
fn optimal_report(world: ProcessWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lp_solve_process.feature", index = 1)]
fn timeout_exit(world: ProcessWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lp_solve_process.feature", index = 2)]
fn infeasible_exit(world: ProcessWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lp_solve_process.feature", index = 3)]
fn unbounded_exit(world: ProcessWorld) {
    let _ = world;
}
