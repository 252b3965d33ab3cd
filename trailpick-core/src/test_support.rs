//! Test doubles for exercising the selection pipeline without `lp_solve`.

use std::sync::Mutex;
use std::time::Duration;

use geo::Coord;

use crate::Trail;
use crate::solver::{MilpSolver, SolverError, SolverOutput, SolverStatus};

/// Trail at the given position with metrics that pass the default filter.
///
/// Elevation gain is 500 feet, length 3 miles and the rating `4.0` from one
/// vote. The display name is derived from `id`.
pub fn trail_at(id: &str, latitude: f64, longitude: f64) -> Trail {
    Trail {
        id: id.to_owned(),
        name: format!("Trail {id}"),
        location: Coord {
            x: longitude,
            y: latitude,
        },
        elevation_gain: 500.0,
        elevation_max: 1_000.0,
        length: 3.0,
        rating: 4.0,
        rating_count: 1,
        features: String::new(),
    }
}

#[derive(Debug, Default)]
struct Calls {
    count: usize,
    last_model: Option<String>,
    last_timeout: Option<Duration>,
}

/// `MilpSolver` that returns a canned response and records each call.
#[derive(Debug)]
pub struct ScriptedSolver {
    response: Result<SolverOutput, SolverError>,
    calls: Mutex<Calls>,
}

impl ScriptedSolver {
    /// Return `response` from every call.
    pub fn new(response: Result<SolverOutput, SolverError>) -> Self {
        Self {
            response,
            calls: Mutex::new(Calls::default()),
        }
    }

    /// Report an optimal solve with the given objective and assignment.
    pub fn optimal(objective: f64, values: &[(&str, f64)]) -> Self {
        Self::new(Ok(SolverOutput {
            status: SolverStatus::Optimal,
            objective: Some(objective),
            values: values
                .iter()
                .map(|(name, value)| ((*name).to_owned(), *value))
                .collect(),
        }))
    }

    /// Number of solves requested so far.
    pub fn calls(&self) -> usize {
        self.calls.lock().map_or(0, |calls| calls.count)
    }

    /// Model text passed to the most recent solve.
    pub fn last_model(&self) -> Option<String> {
        self.calls
            .lock()
            .ok()
            .and_then(|calls| calls.last_model.clone())
    }

    /// Timeout passed to the most recent solve.
    pub fn last_timeout(&self) -> Option<Duration> {
        self.calls.lock().ok().and_then(|calls| calls.last_timeout)
    }
}

impl MilpSolver for ScriptedSolver {
    fn solve(&self, model: &str, timeout: Duration) -> Result<SolverOutput, SolverError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.count += 1;
            calls.last_model = Some(model.to_owned());
            calls.last_timeout = Some(timeout);
        }
        self.response.clone()
    }
}
