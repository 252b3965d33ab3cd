//! CSV trail catalog loader.
//!
//! The catalog has a header row naming at least `tid` and `name`. The columns
//! `lat`, `lng`, `elevGain`, `elevMax`, `length`, `rating`, `num_ratings` and
//! `features` are optional; empty or absent cells read as zero or the empty
//! string. Other columns such as `kml` are ignored.
//!
//! Bad records are skipped and reported, never fatal.

use std::collections::HashSet;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use serde::Deserialize;
use thiserror::Error;
use trailpick_core::{Trail, TrailError};

use crate::fs::open_utf8_file;

/// Columns every catalog must declare.
pub const REQUIRED_COLUMNS: [&str; 2] = ["tid", "name"];

/// Catalog row exactly as written, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTrail {
    tid: Option<String>,
    name: Option<String>,
    lat: Option<String>,
    lng: Option<String>,
    #[serde(rename = "elevGain")]
    elevation_gain: Option<String>,
    #[serde(rename = "elevMax")]
    elevation_max: Option<String>,
    length: Option<String>,
    rating: Option<String>,
    num_ratings: Option<String>,
    features: Option<String>,
}

/// Why a record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// Identity fields were missing.
    #[error(transparent)]
    Invalid(#[from] TrailError),
    /// A numeric cell did not parse or was not finite.
    #[error("column {column} has invalid numeric value `{value}`")]
    InvalidNumber {
        /// Column header.
        column: &'static str,
        /// Cell contents.
        value: String,
    },
    /// The identifier was already used by an earlier record.
    #[error("duplicate trail id {id}")]
    DuplicateId {
        /// Repeated identifier.
        id: String,
    },
    /// The record could not be split into fields.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A skipped record and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct RecordRejection {
    /// One-based line number in the source.
    pub line: u64,
    /// What was wrong.
    pub reason: RejectionReason,
}

/// Result of loading a catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogLoad {
    /// Accepted trails in file order.
    pub trails: Vec<Trail>,
    /// Records that were skipped.
    pub rejected: Vec<RecordRejection>,
}

/// Errors that abort a catalog load.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be opened.
    #[error("failed to open trail catalog at {path}")]
    Open {
        /// Catalog location.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Reading the catalog failed part way through.
    #[error("failed to read trail catalog")]
    Read {
        /// Underlying error.
        #[source]
        source: csv::Error,
    },
    /// The header row lacks a required column.
    #[error("trail catalog header is missing the `{column}` column")]
    MissingColumn {
        /// Missing header.
        column: &'static str,
    },
}

/// Load the catalog at `path`.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use trailpick_data::load_catalog;
///
/// # fn main() -> Result<(), trailpick_data::CatalogError> {
/// let load = load_catalog(Utf8Path::new("trails_with_ratings.csv"))?;
/// for rejection in &load.rejected {
///     eprintln!("{rejection}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn load_catalog(path: &Utf8Path) -> Result<CatalogLoad, CatalogError> {
    let file = open_utf8_file(path).map_err(|source| CatalogError::Open {
        path: path.to_owned(),
        source,
    })?;
    let load = read_catalog(file)?;
    log::debug!(
        "loaded {} trails from {path} ({} rejected)",
        load.trails.len(),
        load.rejected.len()
    );
    Ok(load)
}

/// Read a catalog from any reader.
///
/// # Examples
/// ```
/// use trailpick_data::read_catalog;
///
/// # fn main() -> Result<(), trailpick_data::CatalogError> {
/// let csv = "tid,name,lat,lng,num_ratings\n1,Rattlesnake Ledge,47.43,-121.77,512\n,Nameless,0,0,1\n";
/// let load = read_catalog(csv.as_bytes())?;
/// assert_eq!(load.trails.len(), 1);
/// assert_eq!(load.trails[0].rating_count, 512);
/// assert_eq!(load.rejected[0].line, 3);
/// # Ok(())
/// # }
/// ```
pub fn read_catalog<R: io::Read>(reader: R) -> Result<CatalogLoad, CatalogError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|source| CatalogError::Read { source })?
        .clone();
    if let Some(column) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(CatalogError::MissingColumn { column });
    }

    let mut load = CatalogLoad::default();
    let mut seen = HashSet::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                return Err(CatalogError::Read { source: err });
            }
            Err(err) => {
                let line = err.position().map_or(0, csv::Position::line);
                reject(&mut load, line, RejectionReason::Malformed(err.to_string()));
                continue;
            }
        };
        let line = record.position().map_or(0, csv::Position::line);
        let parsed = record
            .deserialize::<RawTrail>(Some(&headers))
            .map_err(|err| RejectionReason::Malformed(err.to_string()))
            .and_then(RawTrail::into_trail);
        match parsed {
            Ok(trail) if !seen.insert(trail.id.clone()) => {
                reject(&mut load, line, RejectionReason::DuplicateId { id: trail.id });
            }
            Ok(trail) => load.trails.push(trail),
            Err(reason) => reject(&mut load, line, reason),
        }
    }
    Ok(load)
}

fn reject(load: &mut CatalogLoad, line: u64, reason: RejectionReason) {
    let rejection = RecordRejection { line, reason };
    log::warn!("skipping catalog record: {rejection}");
    load.rejected.push(rejection);
}

impl RawTrail {
    fn into_trail(self) -> Result<Trail, RejectionReason> {
        let location = Coord {
            x: number("lng", self.lng.as_deref())?,
            y: number("lat", self.lat.as_deref())?,
        };
        let trail = Trail::new(
            self.tid.unwrap_or_default(),
            self.name.unwrap_or_default(),
            location,
        )?
        .with_elevation(
            number("elevGain", self.elevation_gain.as_deref())?,
            number("elevMax", self.elevation_max.as_deref())?,
        )
        .with_length(number("length", self.length.as_deref())?)
        .with_rating(
            number("rating", self.rating.as_deref())?,
            cell("num_ratings", self.num_ratings.as_deref())?,
        )
        .with_features(self.features.unwrap_or_default());
        Ok(trail)
    }
}

/// Parse an optional cell, reading empty as zero.
fn cell<T>(column: &'static str, raw: Option<&str>) -> Result<T, RejectionReason>
where
    T: std::str::FromStr + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value.parse().map_err(|_| invalid_number(column, value)),
    }
}

/// Parse an optional cell as a finite real number.
///
/// `NaN` and the infinities parse as `f64` but are rejected.
fn number(column: &'static str, raw: Option<&str>) -> Result<f64, RejectionReason> {
    let value: f64 = cell(column, raw)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid_number(column, raw.map(str::trim).unwrap_or_default()))
    }
}

fn invalid_number(column: &'static str, value: &str) -> RejectionReason {
    RejectionReason::InvalidNumber {
        column,
        value: value.to_owned(),
    }
}
