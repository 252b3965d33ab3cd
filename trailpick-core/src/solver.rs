//! Boundary to an external MILP solver.

use std::time::Duration;

use thiserror::Error;

/// Default wall-clock budget for a solve.
pub const DEFAULT_SOLVER_TIMEOUT: Duration = Duration::from_secs(600);

/// Termination status reported by a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    /// A proven optimum was found.
    Optimal,
    /// A feasible but unproven solution was found.
    Suboptimal,
    /// The time budget ran out.
    Timeout,
    /// No feasible assignment exists.
    Infeasible,
}

/// Raw result of a solve.
///
/// `values` pairs variable names as written in the model with their values;
/// it may be empty for non-optimal statuses.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutput {
    /// Termination status.
    pub status: SolverStatus,
    /// Objective value, when the solver reported one.
    pub objective: Option<f64>,
    /// Variable assignment.
    pub values: Vec<(String, f64)>,
}

impl SolverOutput {
    /// Output carrying only a status.
    pub const fn status_only(status: SolverStatus) -> Self {
        Self {
            status,
            objective: None,
            values: Vec::new(),
        }
    }
}

/// Errors raised while talking to a solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The solver process could not be started.
    #[error("failed to launch solver `{program}`: {message}")]
    Launch {
        /// Program that was invoked.
        program: String,
        /// Underlying error.
        message: String,
    },
    /// Piping the model or collecting output failed.
    #[error("solver I/O failed: {message}")]
    Io {
        /// Underlying error.
        message: String,
    },
    /// The solver reported a condition outside the supported statuses.
    #[error("solver fault (exit code {code:?}): {detail}")]
    SolverFault {
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Diagnostic detail.
        detail: String,
    },
    /// The solver's report could not be parsed.
    #[error("unparseable solver output: {reason}")]
    MalformedOutput {
        /// What went wrong.
        reason: String,
    },
}

/// Solve an LP-format integer program within a time budget.
///
/// Implementations must be `Send + Sync`. Timeouts and infeasibility are
/// statuses, not errors.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use trailpick_core::{MilpSolver, SolverError, SolverOutput, SolverStatus};
///
/// struct AlwaysInfeasible;
///
/// impl MilpSolver for AlwaysInfeasible {
///     fn solve(&self, _model: &str, _timeout: Duration) -> Result<SolverOutput, SolverError> {
///         Ok(SolverOutput::status_only(SolverStatus::Infeasible))
///     }
/// }
///
/// let output = AlwaysInfeasible.solve("max: 0;", Duration::from_secs(1)).unwrap();
/// assert_eq!(output.status, SolverStatus::Infeasible);
/// ```
pub trait MilpSolver: Send + Sync {
    /// Solve `model`, giving up after `timeout`.
    fn solve(&self, model: &str, timeout: Duration) -> Result<SolverOutput, SolverError>;
}
