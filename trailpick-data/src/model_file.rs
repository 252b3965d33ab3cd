//! Persisting emitted LP text.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::fs::write_utf8_file;

/// Errors raised by [`write_model_file`].
#[derive(Debug, Error)]
#[error("failed to write model file at {path}")]
pub struct ModelFileError {
    /// Target location.
    pub path: Utf8PathBuf,
    /// Underlying error.
    #[source]
    pub source: io::Error,
}

/// Write `model_text` to `path`, replacing any previous model.
pub fn write_model_file(path: &Utf8Path, model_text: &str) -> Result<(), ModelFileError> {
    write_utf8_file(path, model_text).map_err(|source| ModelFileError {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("wrote {} bytes of LP text to {path}", model_text.len());
    Ok(())
}
