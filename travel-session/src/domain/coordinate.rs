//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing or validating an invalid coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A point on the map in signed decimal degrees.
///
/// Equality is exact field equality with no tolerance: two picks at
/// 52.52 and 52.520000001 are different picks. This is geodesically naive
/// but it is what decides whether a re-pick counts as a change.
///
/// # Examples
///
/// ```
/// use travel_session::domain::Coordinate;
///
/// let berlin = Coordinate::parse("52.5200,13.4050").unwrap();
/// assert_eq!(berlin, Coordinate::new(52.52, 13.405));
///
/// // Out of range latitude is rejected
/// assert!(Coordinate::parse("91.0,13.4").is_err());
///
/// // Missing component is rejected
/// assert!(Coordinate::parse("52.52").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without validation.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinate {
                reason: "components must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate {
                reason: "latitude must be within -90..=90",
            });
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate {
                reason: "longitude must be within -180..=180",
            });
        }

        Ok(Self::new(latitude, longitude))
    }

    /// Parses `"lat,lon"` (whitespace around either component is allowed).
    pub fn parse(s: &str) -> Result<Self, InvalidCoordinate> {
        let (lat, lon) = s.split_once(',').ok_or(InvalidCoordinate {
            reason: "expected \"lat,lon\"",
        })?;

        let latitude = lat.trim().parse::<f64>().map_err(|_| InvalidCoordinate {
            reason: "latitude is not a number",
        })?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| InvalidCoordinate {
            reason: "longitude is not a number",
        })?;

        Self::try_new(latitude, longitude)
    }

    /// Converts to a `geo` coordinate (x = longitude, y = latitude).
    pub fn to_geo(self) -> geo::Coord<f64> {
        geo::Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Converts from a `geo` coordinate (x = longitude, y = latitude).
    pub fn from_geo(coord: geo::Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
