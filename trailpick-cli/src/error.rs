//! Error types emitted by the trailpick CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use trailpick_core::{ObjectiveModeError, SelectionError};
use trailpick_data::{CatalogError, ModelFileError};

/// Errors emitted by the trailpick CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// `--obj` named no known objective.
    #[error("invalid --obj: {0}")]
    InvalidObjective(#[from] ObjectiveModeError),
    /// An option holds a value outside its domain.
    #[error("invalid --{field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// The trail catalog could not be read.
    #[error(transparent)]
    LoadCatalog(#[from] CatalogError),
    /// Selection failed while building, rendering or solving the model.
    #[error(transparent)]
    Select(#[from] SelectionError),
    /// The model file could not be written.
    #[error(transparent)]
    WriteModel(#[from] ModelFileError),
    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    WriteReport(#[source] std::io::Error),
}
