//! Single-trail feasibility filter.
//!
//! Trails failing any predicate never reach the model, so they cost neither a
//! variable nor a pairwise constraint group.

use geo::Coord;

use crate::{DistanceUnit, Trail, distance};

/// Default trip origin (Red Square, University of Washington).
pub const DEFAULT_ORIGIN: Coord<f64> = Coord {
    x: -122.309,
    y: 47.656,
};

/// Bounds applied to each trail independently.
///
/// Unbounded limits are `f64::INFINITY`. Distances are in miles.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use trailpick_core::{Trail, TrailFilter};
///
/// # fn main() -> Result<(), trailpick_core::TrailError> {
/// let near = Trail::new("a", "Near", Coord { x: -122.3, y: 47.6 })?
///     .with_elevation(500.0, 900.0)
///     .with_length(3.0)
///     .with_rating(4.0, 12);
/// let unrated = near.clone().with_rating(0.0, 0);
///
/// let eligible = TrailFilter::default().apply(&[near.clone(), unrated]);
/// assert_eq!(eligible, vec![near]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrailFilter {
    /// Minimum number of ratings.
    pub min_rating_count: u32,
    /// Minimum elevation gain in feet.
    pub min_elevation_gain: f64,
    /// Maximum elevation gain in feet.
    pub max_elevation_gain: f64,
    /// Maximum length in miles.
    pub max_length: f64,
    /// Maximum distance from [`TrailFilter::origin`] in miles.
    pub max_distance_from_origin: f64,
    /// Trip origin.
    pub origin: Coord<f64>,
}

impl Default for TrailFilter {
    fn default() -> Self {
        Self {
            min_rating_count: 1,
            min_elevation_gain: 1.0,
            max_elevation_gain: f64::INFINITY,
            max_length: f64::INFINITY,
            max_distance_from_origin: 25.0,
            origin: DEFAULT_ORIGIN,
        }
    }
}

impl TrailFilter {
    /// Report whether `trail` satisfies every predicate.
    pub fn accepts(&self, trail: &Trail) -> bool {
        trail.rating_count >= self.min_rating_count
            && trail.elevation_gain >= self.min_elevation_gain
            && trail.elevation_gain <= self.max_elevation_gain
            && trail.length <= self.max_length
            && trail.length > 0.0
            && distance(trail.location, self.origin, DistanceUnit::Miles)
                <= self.max_distance_from_origin
    }

    /// Return the eligible trails in input order.
    pub fn apply(&self, trails: &[Trail]) -> Vec<Trail> {
        let eligible: Vec<Trail> = trails
            .iter()
            .filter(|trail| self.accepts(trail))
            .cloned()
            .collect();
        log::debug!(
            "filter kept {} of {} trails",
            eligible.len(),
            trails.len()
        );
        eligible
    }
}
