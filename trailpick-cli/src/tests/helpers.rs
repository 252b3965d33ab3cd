//! Test helpers for writing catalogs and scripting the solver.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use trailpick_core::test_support::ScriptedSolver;
use trailpick_core::{MilpSolver, SolverError, SolverOutput};

use crate::solve::{SolveConfig, SolverBuilder};

/// Three trails near the default start point with rating counts 10, 20 and 30.
pub(super) const SAMPLE_CATALOG: &str = "\
tid,name,lat,lng,elevGain,elevMax,length,rating,num_ratings,features,kml
101,Rattlesnake Ledge,47.60,-122.30,500,1000,3,4,10,views,
102,Cougar Mountain,47.61,-122.31,500,1000,3,3,20,,
103,Tiger Mountain,47.62,-122.32,500,1000,3,5,30,\"views,dogs\",
";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory exposed as a UTF-8 path.
pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Solver handle shared between the builder and the test's assertions.
struct SharedSolver(Arc<ScriptedSolver>);

impl MilpSolver for SharedSolver {
    fn solve(&self, model: &str, timeout: Duration) -> Result<SolverOutput, SolverError> {
        self.0.solve(model, timeout)
    }
}

pub(super) struct StubSolverBuilder {
    pub(super) solver: Arc<ScriptedSolver>,
}

impl StubSolverBuilder {
    pub(super) fn new(solver: ScriptedSolver) -> Self {
        Self {
            solver: Arc::new(solver),
        }
    }
}

impl SolverBuilder for StubSolverBuilder {
    fn build(&self, _config: &SolveConfig) -> Box<dyn MilpSolver> {
        Box::new(SharedSolver(Arc::clone(&self.solver)))
    }
}
