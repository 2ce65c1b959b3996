//! Camera region for the map display.

use geo::Rect;
use serde::Serialize;

use super::Coordinate;

/// A rectangular latitude/longitude extent the map camera should show.
///
/// Stored as its south-west and north-east corners so that a region built
/// from a route's bounding box reports exactly that box back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraRegion {
    south_west: Coordinate,
    north_east: Coordinate,
}

impl CameraRegion {
    /// Region covering a bounding rectangle.
    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self {
            south_west: Coordinate::from_geo(rect.min()),
            north_east: Coordinate::from_geo(rect.max()),
        }
    }

    /// Region centered on `center` with the given span in degrees.
    pub fn centered(center: Coordinate, latitude_span: f64, longitude_span: f64) -> Self {
        let half_lat = latitude_span / 2.0;
        let half_lon = longitude_span / 2.0;
        Self {
            south_west: Coordinate::new(center.latitude - half_lat, center.longitude - half_lon),
            north_east: Coordinate::new(center.latitude + half_lat, center.longitude + half_lon),
        }
    }

    /// South-west corner.
    pub fn south_west(&self) -> Coordinate {
        self.south_west
    }

    /// North-east corner.
    pub fn north_east(&self) -> Coordinate {
        self.north_east
    }

    /// Center of the region.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }

    /// Span as (latitude degrees, longitude degrees).
    pub fn span(&self) -> (f64, f64) {
        (
            self.north_east.latitude - self.south_west.latitude,
            self.north_east.longitude - self.south_west.longitude,
        )
    }

    /// Returns true if the coordinate lies inside or on the edge of the region.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&coordinate.latitude)
            && (self.south_west.longitude..=self.north_east.longitude)
                .contains(&coordinate.longitude)
    }
}
