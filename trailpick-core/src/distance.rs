//! Great-circle distance between trailheads.
//!
//! Uses the spherical law of cosines on degree coordinates, scaled by the
//! nautical-mile-per-arc-minute constant. Points closer than
//! [`COINCIDENT_TOLERANCE_DEG`] on both axes are treated as identical.

use geo::Coord;

/// Per-axis tolerance in degrees below which two points are the same place.
pub const COINCIDENT_TOLERANCE_DEG: f64 = 1e-6;

/// Statute miles per degree of arc (60 arc minutes of 1.1515 miles each).
const MILES_PER_DEGREE: f64 = 60.0 * 1.1515;
const KILOMETRES_PER_MILE: f64 = 1.609_344;
const NAUTICAL_MILES_PER_MILE: f64 = 0.8684;

/// Unit for [`distance`] results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceUnit {
    /// Statute miles.
    #[default]
    Miles,
    /// Kilometres.
    Kilometres,
    /// Nautical miles.
    NauticalMiles,
}

impl DistanceUnit {
    const fn from_miles_factor(self) -> f64 {
        match self {
            Self::Miles => 1.0,
            Self::Kilometres => KILOMETRES_PER_MILE,
            Self::NauticalMiles => NAUTICAL_MILES_PER_MILE,
        }
    }
}

/// Distance between two WGS84 points (`x = longitude`, `y = latitude`).
///
/// Always finite and non-negative for finite input.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use trailpick_core::{DistanceUnit, distance};
///
/// let seattle = Coord { x: -122.309, y: 47.656 };
/// assert_eq!(distance(seattle, seattle, DistanceUnit::Miles), 0.0);
///
/// let one_degree_north = Coord { x: -122.309, y: 48.656 };
/// let miles = distance(seattle, one_degree_north, DistanceUnit::Miles);
/// assert!((miles - 69.09).abs() < 1e-6);
/// ```
pub fn distance(a: Coord<f64>, b: Coord<f64>, unit: DistanceUnit) -> f64 {
    if (a.y - b.y).abs() < COINCIDENT_TOLERANCE_DEG && (a.x - b.x).abs() < COINCIDENT_TOLERANCE_DEG
    {
        return 0.0;
    }

    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let theta = (a.x - b.x).to_radians();
    let cosine = lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * theta.cos();
    // Rounding can push the sum just past ±1, where `acos` is undefined.
    let arc_degrees = cosine.clamp(-1.0, 1.0).acos().to_degrees();
    arc_degrees * MILES_PER_DEGREE * unit.from_miles_factor()
}
