//! `lp_solve` backend for trailpick.
//!
//! [`LpSolveSolver`] implements [`MilpSolver`](trailpick_core::MilpSolver) by
//! running the `lp_solve` command-line tool. The model is written to the
//! child's stdin and the textual report on stdout is parsed back into a
//! [`SolverOutput`](trailpick_core::SolverOutput).
//!
//! Exit codes map to statuses as follows: `0` optimal, `1` suboptimal, `2`
//! infeasible and `7` timeout. Every other code, unbounded (`3`) included, is
//! a [`SolverError::SolverFault`](trailpick_core::SolverError::SolverFault).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod report;
mod solver;

pub use report::{exit_code, parse_output, parse_report, status_for_exit};
pub use solver::{DEFAULT_PROGRAM, LpSolveConfig, LpSolveSolver};
