//! Trail records considered for selection.

use geo::Coord;
use thiserror::Error;

use crate::distance::{DistanceUnit, distance};

/// A hiking trail read from the catalog.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Elevations
/// are in feet and lengths in miles. Trails never change after construction.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use trailpick_core::Trail;
///
/// # fn main() -> Result<(), trailpick_core::TrailError> {
/// let trail = Trail::new("mount-si", "Mount Si", Coord { x: -121.73, y: 47.49 })?
///     .with_elevation(3150.0, 3900.0)
///     .with_length(8.0)
///     .with_rating(4.3, 812);
/// assert_eq!(trail.rating_count, 812);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    /// Catalog identifier, unique within a catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Trailhead position.
    pub location: Coord<f64>,
    /// Cumulative elevation gain in feet.
    pub elevation_gain: f64,
    /// Highest point in feet.
    pub elevation_max: f64,
    /// Round-trip length in miles.
    pub length: f64,
    /// Average user rating, typically `0.0..=5.0`.
    pub rating: f64,
    /// Number of user ratings.
    pub rating_count: u32,
    /// Free-form feature list copied from the catalog.
    pub features: String,
}

/// Errors returned by [`Trail::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrailError {
    /// The identifier was empty or whitespace.
    #[error("trail identifier must not be empty")]
    MissingId,
    /// The display name was empty or whitespace.
    #[error("trail {id} must have a name")]
    MissingName {
        /// Identifier of the offending trail.
        id: String,
    },
}

impl Trail {
    /// Validate identity fields and construct a trail with zeroed metrics.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: Coord<f64>,
    ) -> Result<Self, TrailError> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() {
            return Err(TrailError::MissingId);
        }
        if name.trim().is_empty() {
            return Err(TrailError::MissingName { id });
        }
        Ok(Self {
            id,
            name,
            location,
            elevation_gain: 0.0,
            elevation_max: 0.0,
            length: 0.0,
            rating: 0.0,
            rating_count: 0,
            features: String::new(),
        })
    }

    /// Set elevation gain and maximum elevation.
    #[must_use]
    pub fn with_elevation(mut self, gain: f64, max: f64) -> Self {
        self.elevation_gain = gain;
        self.elevation_max = max;
        self
    }

    /// Set the trail length in miles.
    #[must_use]
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Set the average rating and the number of ratings behind it.
    #[must_use]
    pub fn with_rating(mut self, rating: f64, rating_count: u32) -> Self {
        self.rating = rating;
        self.rating_count = rating_count;
        self
    }

    /// Attach the catalog's feature list.
    #[must_use]
    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.features = features.into();
        self
    }

    /// Latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Great-circle distance between two trailheads.
    pub fn distance_to(&self, other: &Self, unit: DistanceUnit) -> f64 {
        distance(self.location, other.location, unit)
    }
}

impl std::fmt::Display for Trail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
