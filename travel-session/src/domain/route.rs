//! Route types.
//!
//! A `Route` is the provider's answer for one transport mode. Its path is
//! opaque to the session: it is only handed to the map as an overlay and
//! used to work out where the camera should look.

use std::fmt;

use geo::{BoundingRect, LineString};

use super::{CameraRegion, Coordinate, DomainError, TransportMode};

/// A provider-computed path between two points for one transport mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    path: LineString<f64>,
    distance_m: f64,
    duration_s: f64,
    mode: TransportMode,
}

impl Route {
    /// Creates a route, validating distance and duration.
    ///
    /// Both must be finite and non-negative.
    pub fn new(
        path: impl IntoIterator<Item = Coordinate>,
        distance_m: f64,
        duration_s: f64,
        mode: TransportMode,
    ) -> Result<Self, DomainError> {
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(DomainError::InvalidRoute(
                "distance must be finite and non-negative",
            ));
        }
        if !duration_s.is_finite() || duration_s < 0.0 {
            return Err(DomainError::InvalidRoute(
                "duration must be finite and non-negative",
            ));
        }

        let path: LineString<f64> = path.into_iter().map(Coordinate::to_geo).collect();

        Ok(Self {
            path,
            distance_m,
            duration_s,
            mode,
        })
    }

    /// The path geometry, for drawing as an overlay.
    pub fn path(&self) -> &LineString<f64> {
        &self.path
    }

    /// Path vertices as coordinates.
    pub fn points(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.path.coords().map(|c| Coordinate::from_geo(*c))
    }

    /// Distance in meters.
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// Expected travel time in seconds.
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// The mode this route was computed for.
    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Bounding extent of the path, or `None` for an empty path.
    pub fn bounding_extent(&self) -> Option<CameraRegion> {
        self.path.bounding_rect().map(CameraRegion::from_rect)
    }

    /// Distance and travel time in display units.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            distance_km: self.distance_m / 1000.0,
            duration_minutes: self.duration_s / 60.0,
        }
    }
}

/// Distance and travel time of a route in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Distance: {:.2} km, Travel Time: {:.2} minutes",
            self.distance_km, self.duration_minutes
        )
    }
}
