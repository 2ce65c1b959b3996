//! Route fixture DTOs.
//!
//! Fixture files hold a JSON array of routes for one transport mode. Each
//! path point is a `[lat, lon]` pair:
//!
//! ```json
//! [
//!   { "path": [[52.52, 13.405], [48.8566, 2.3522]], "distance_m": 1054000, "duration_s": 34200 }
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, DomainError, Route, TransportMode};

/// One route as stored in a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteFixture {
    /// Path vertices as `[lat, lon]`.
    pub path: Vec<[f64; 2]>,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl RouteFixture {
    /// Convert to a validated route for `mode`.
    pub fn into_route(self, mode: TransportMode) -> Result<Route, DomainError> {
        let path = self
            .path
            .into_iter()
            .map(|[lat, lon]| Coordinate::try_new(lat, lon))
            .collect::<Result<Vec<_>, _>>()?;

        Route::new(path, self.distance_m, self.duration_s, mode)
    }
}

/// Parse a fixture file body into routes for `mode`.
pub fn parse_fixture(json: &str, mode: TransportMode) -> Result<Vec<Route>, String> {
    let fixtures: Vec<RouteFixture> = serde_json::from_str(json).map_err(|e| e.to_string())?;

    fixtures
        .into_iter()
        .map(|f| f.into_route(mode).map_err(|e| e.to_string()))
        .collect()
}
