//! Session configuration.

use crate::domain::{CameraRegion, Coordinate};

/// Berlin, the map's resting position before anything is known.
const DEFAULT_CENTER: Coordinate = Coordinate::new(52.5200, 13.4050);

/// Configuration parameters for a route session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Camera center when there is neither a route nor a device location.
    pub default_center: Coordinate,

    /// Camera span in degrees (both axes) around the default center or the
    /// device location.
    pub span_degrees: f64,

    /// Maximum number of ranked alternatives kept for a single mode.
    pub max_alternatives: usize,
}

impl SessionConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        default_center: Coordinate,
        span_degrees: f64,
        max_alternatives: usize,
    ) -> Self {
        Self {
            default_center,
            span_degrees,
            max_alternatives,
        }
    }

    /// Set the default camera center.
    pub fn with_default_center(mut self, center: Coordinate) -> Self {
        self.default_center = center;
        self
    }

    /// Set the camera span.
    pub fn with_span(mut self, span_degrees: f64) -> Self {
        self.span_degrees = span_degrees;
        self
    }

    /// Camera region around the default center.
    pub fn default_region(&self) -> CameraRegion {
        self.region_around(self.default_center)
    }

    /// Camera region of the configured span around `center`.
    pub fn region_around(&self, center: Coordinate) -> CameraRegion {
        CameraRegion::centered(center, self.span_degrees, self.span_degrees)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            span_degrees: 0.1,
            max_alternatives: 3,
        }
    }
}
