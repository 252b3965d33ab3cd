//! Catalog ingestion and model persistence for trailpick.
//!
//! Responsibilities:
//! - Read CSV trail catalogs into [`trailpick_core::Trail`] records, reporting
//!   rejected rows instead of failing the whole load.
//! - Write emitted LP text to disk.
//!
//! Domain rules live in `trailpick-core`.

mod catalog;
mod fs;
mod model_file;

pub use catalog::{
    CatalogError, CatalogLoad, REQUIRED_COLUMNS, RecordRejection, RejectionReason, load_catalog,
    read_catalog,
};
pub use model_file::{ModelFileError, write_model_file};
