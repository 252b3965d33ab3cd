//! `MilpSolver` implementation that shells out to `lp_solve`.

use std::io::{self, Write};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;

use camino::Utf8PathBuf;
use trailpick_core::{MilpSolver, SolverError, SolverOutput};

use crate::report::parse_output;

/// Program invoked when none is configured.
pub const DEFAULT_PROGRAM: &str = "lp_solve";

/// Configuration for [`LpSolveSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpSolveConfig {
    /// Executable to run; looked up on `PATH` when not a path.
    pub program: Utf8PathBuf,
    /// Arguments placed before the generated ones.
    pub leading_args: Vec<String>,
}

impl Default for LpSolveConfig {
    fn default() -> Self {
        Self {
            program: Utf8PathBuf::from(DEFAULT_PROGRAM),
            leading_args: Vec::new(),
        }
    }
}

/// Solver running `lp_solve -S4 -timeout <secs>` with the model on stdin.
///
/// The time budget is enforced by `lp_solve` itself and rounded up to whole
/// seconds.
///
/// # Examples
/// ```no_run
/// use std::time::Duration;
/// use trailpick_core::MilpSolver;
/// use trailpick_solver_lpsolve::LpSolveSolver;
///
/// let solver = LpSolveSolver::new();
/// let output = solver.solve("max: x;\nx <= 1;\nbin x;\n", Duration::from_secs(10));
/// assert!(output.is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LpSolveSolver {
    config: LpSolveConfig,
}

impl LpSolveSolver {
    /// Solver invoking [`DEFAULT_PROGRAM`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: LpSolveConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LpSolveConfig {
        &self.config
    }

    fn command(&self, timeout: Duration) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.leading_args)
            .arg("-S4")
            .arg("-timeout")
            .arg(timeout_secs(timeout).to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    fn run(&self, model: &str, timeout: Duration) -> Result<Output, SolverError> {
        let mut child = self
            .command(timeout)
            .spawn()
            .map_err(|err| SolverError::Launch {
                program: self.config.program.to_string(),
                message: err.to_string(),
            })?;
        let mut stdin = child.stdin.take().ok_or_else(|| SolverError::Io {
            message: "solver stdin was not captured".to_owned(),
        })?;

        // Feed stdin concurrently so a full stdout pipe cannot stall the write.
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || {
                stdin.write_all(model.as_bytes())?;
                stdin.flush()
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output.map_err(io_error)?;
        if let Err(err) = written {
            // lp_solve may stop reading once it rejects the model.
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(io_error(err));
            }
        }
        Ok(output)
    }
}

impl MilpSolver for LpSolveSolver {
    fn solve(&self, model: &str, timeout: Duration) -> Result<SolverOutput, SolverError> {
        log::debug!(
            "running {} with a {}s limit",
            self.config.program,
            timeout_secs(timeout)
        );
        let output = self.run(model, timeout)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let Some(code) = output.status.code() else {
            return Err(SolverError::SolverFault {
                code: None,
                detail: format!("terminated by signal: {}", stderr.trim()),
            });
        };
        let result = parse_output(code, &stdout, &stderr)?;
        log::info!("lp_solve exited with code {code}: {:?}", result.status);
        Ok(result)
    }
}

const fn timeout_secs(timeout: Duration) -> u64 {
    let secs = timeout.as_secs();
    if timeout.subsec_nanos() > 0 || secs == 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

fn io_error(err: io::Error) -> SolverError {
    SolverError::Io {
        message: err.to_string(),
    }
}
