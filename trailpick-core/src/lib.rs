//! Core domain for trail selection.
//!
//! A catalog of [`Trail`]s is filtered by [`TrailFilter`], turned into a binary
//! integer program by [`SelectionModel`], written as `lp_solve` LP text by
//! [`emit_lp`] and handed to a [`MilpSolver`]. [`interpret`] maps the solver's
//! answer back onto trails. [`select_trails`] runs the whole sequence;
//! [`prepare_selection`] stops before the solver so the LP text can be saved first.
//!
//! The crate performs no I/O of its own; solvers and catalog readers live in
//! sibling crates.

pub mod distance;
pub mod filter;
pub mod lp;
pub mod model;
pub mod objective;
pub mod outcome;
pub mod pipeline;
pub mod solver;
pub mod trail;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use distance::{COINCIDENT_TOLERANCE_DEG, DistanceUnit, distance};
pub use filter::{DEFAULT_ORIGIN, TrailFilter};
pub use lp::{LP_INFINITY, LpError, emit_lp, write_lp};
pub use model::{
    Constraint, ConstraintKind, DEFAULT_BIG_M, DEFAULT_SEPARATION_ITEM_LIMIT, LinearExpr,
    ModelError, ModelParameters, Relation, SelectionModel, VariableId, VariableKey,
    VariableRegistry,
};
pub use objective::{ObjectiveMode, ObjectiveModeError};
pub use outcome::{
    INFEASIBLE_OBJECTIVE_THRESHOLD, SELECTION_TOLERANCE, Selection, SelectionOutcome, interpret,
};
pub use pipeline::{
    PreparedSelection, SelectionConfig, SelectionError, SelectionRun, build_model,
    prepare_selection, select_trails,
};
pub use solver::{DEFAULT_SOLVER_TIMEOUT, MilpSolver, SolverError, SolverOutput, SolverStatus};
pub use trail::{Trail, TrailError};
