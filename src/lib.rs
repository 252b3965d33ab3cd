//! Facade crate for trailpick, a trail selection model generator.
//!
//! This crate re-exports the core model types and exposes the CSV catalog
//! loader and the `lp_solve` adapter behind feature flags.
//!
//! # Examples
//! ```
//! # #[cfg(feature = "catalog-csv")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use trailpick::{ModelParameters, SelectionConfig, build_model, emit_lp, read_catalog};
//!
//! let csv = "tid,name,lat,lng,elevGain,length,num_ratings\n\
//!            1,Poo Poo Point,47.50,-122.03,1858,3.8,40\n";
//! let load = read_catalog(csv.as_bytes())?;
//! let config = SelectionConfig {
//!     model: ModelParameters {
//!         target_count: 1,
//!         ..ModelParameters::default()
//!     },
//!     ..SelectionConfig::default()
//! };
//! let (eligible, model) = build_model(&load.trails, &config)?;
//! assert_eq!(eligible.len(), 1);
//! assert!(emit_lp(&model)?.starts_with("max: 40*x_0;\ncount: x_0 = 1;\n"));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "catalog-csv"))]
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]

pub use trailpick_core::{
    Constraint, ConstraintKind, DistanceUnit, LinearExpr, LpError, MilpSolver, ModelError,
    ModelParameters, ObjectiveMode, ObjectiveModeError, PreparedSelection, Relation, Selection,
    SelectionConfig, SelectionError, SelectionModel, SelectionOutcome, SelectionRun, SolverError,
    SolverOutput, SolverStatus, Trail, TrailError, TrailFilter, VariableId, VariableKey,
    VariableRegistry, build_model, distance, emit_lp, interpret, prepare_selection, select_trails,
    write_lp,
};

#[cfg(feature = "catalog-csv")]
pub use trailpick_data::{
    CatalogError, CatalogLoad, ModelFileError, RecordRejection, RejectionReason, load_catalog,
    read_catalog, write_model_file,
};

#[cfg(feature = "solver-lpsolve")]
pub use trailpick_solver_lpsolve::{LpSolveConfig, LpSolveSolver};

#[cfg(feature = "test-support")]
pub use trailpick_core::test_support;
