//! Per-trail objective coefficients.
//!
//! Each [`ObjectiveMode`] turns a trail's rating data into the coefficient of
//! its selection variable. Coefficients never depend on other trails.

use thiserror::Error;

use crate::Trail;

/// Scoring function maximised by the selection model.
///
/// # Examples
/// ```
/// use trailpick_core::ObjectiveMode;
///
/// let mode = ObjectiveMode::try_from(2_u8).unwrap();
/// assert_eq!(mode, ObjectiveMode::WeightedPopularity);
/// assert!(ObjectiveMode::try_from(4_u8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectiveMode {
    /// Sum of rating counts.
    #[default]
    Popularity,
    /// Sum of ratings.
    Quality,
    /// Sum of `rating_count * e^rating`.
    WeightedPopularity,
    /// Sum of squared ratings.
    QualityEmphasis,
}

/// Errors raised when decoding an [`ObjectiveMode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectiveModeError {
    /// The value does not name a known objective.
    #[error("unknown objective mode `{0}` (expected 0-3 or a mode name)")]
    Unknown(String),
}

impl ObjectiveMode {
    /// Every mode in numeric order.
    pub const ALL: [Self; 4] = [
        Self::Popularity,
        Self::Quality,
        Self::WeightedPopularity,
        Self::QualityEmphasis,
    ];

    /// Numeric code used on the command line.
    pub const fn code(self) -> u8 {
        match self {
            Self::Popularity => 0,
            Self::Quality => 1,
            Self::WeightedPopularity => 2,
            Self::QualityEmphasis => 3,
        }
    }

    /// Kebab-case name of the mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Quality => "quality",
            Self::WeightedPopularity => "weighted-popularity",
            Self::QualityEmphasis => "quality-emphasis",
        }
    }

    /// Objective coefficient for `trail`.
    pub fn coefficient(self, trail: &Trail) -> f64 {
        let count = f64::from(trail.rating_count);
        match self {
            Self::Popularity => count,
            Self::Quality => trail.rating,
            Self::WeightedPopularity => count * trail.rating.exp(),
            Self::QualityEmphasis => trail.rating.powi(2),
        }
    }
}

impl TryFrom<u8> for ObjectiveMode {
    type Error = ObjectiveModeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.code() == value)
            .ok_or_else(|| ObjectiveModeError::Unknown(value.to_string()))
    }
}

impl std::str::FromStr for ObjectiveMode {
    type Err = ObjectiveModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ObjectiveModeError::Unknown(s.to_owned()))
    }
}

impl std::fmt::Display for ObjectiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.as_str())
    }
}
