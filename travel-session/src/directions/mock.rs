//! Mock collaborators for development and testing without real services.
//!
//! `MockDirections` loads route fixtures from JSON files and serves them as
//! if they were live provider responses. The geocoder and location mocks
//! answer from in-memory data.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::domain::{Coordinate, Route, TransportMode};

use super::error::{DirectionsError, GeocodeError, LocationError};
use super::fixture::parse_fixture;
use super::provider::{DirectionsProvider, Geocoder, LocationProvider};

/// Directions provider that answers from fixtures, keyed by mode only.
///
/// The requested coordinates are ignored. A mode with no fixture fails with
/// a provider error, which is how tests model a mode that is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MockDirections {
    responses: HashMap<TransportMode, Result<Vec<Route>, DirectionsError>>,
    latency: HashMap<TransportMode, Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockDirections {
    /// Create a mock with no data; every request fails until configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a directory.
    ///
    /// Expects files named after the mode (`drive.json`, `walk.json`,
    /// `transit.json`). Missing files are fine, but at least one must exist.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, DirectionsError> {
        let data_dir = data_dir.as_ref();
        let mut mock = Self::new();

        for mode in TransportMode::ALL {
            let path = data_dir.join(format!("{}.json", mode.as_str()));
            if !path.is_file() {
                debug!(mode = %mode, path = %path.display(), "No fixture for mode");
                continue;
            }

            let json = std::fs::read_to_string(&path).map_err(|e| DirectionsError::Fixture {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let routes = parse_fixture(&json, mode).map_err(|message| DirectionsError::Fixture {
                path: path.display().to_string(),
                message,
            })?;

            debug!(mode = %mode, routes = routes.len(), "Loaded route fixture");
            mock.responses.insert(mode, Ok(routes));
        }

        if mock.responses.is_empty() {
            return Err(DirectionsError::Fixture {
                path: data_dir.display().to_string(),
                message: "no route fixtures found".to_string(),
            });
        }

        Ok(mock)
    }

    /// Serve `routes` for `mode`.
    pub fn with_routes(mut self, mode: TransportMode, routes: Vec<Route>) -> Self {
        self.responses.insert(mode, Ok(routes));
        self
    }

    /// Fail every request for `mode` with `error`.
    pub fn with_failure(mut self, mode: TransportMode, error: DirectionsError) -> Self {
        self.responses.insert(mode, Err(error));
        self
    }

    /// Delay responses for `mode`.
    pub fn with_latency(mut self, mode: TransportMode, latency: Duration) -> Self {
        self.latency.insert(mode, latency);
        self
    }

    /// Modes that have fixture data (successful or failing).
    pub fn configured_modes(&self) -> Vec<TransportMode> {
        TransportMode::ALL
            .into_iter()
            .filter(|m| self.responses.contains_key(m))
            .collect()
    }

    /// Number of requests served so far, shared across clones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl DirectionsProvider for MockDirections {
    async fn request_route(
        &self,
        _from: Coordinate,
        _to: Coordinate,
        mode: TransportMode,
    ) -> Result<Vec<Route>, DirectionsError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.latency.get(&mode) {
            tokio::time::sleep(*latency).await;
        }

        match self.responses.get(&mode) {
            Some(response) => response.clone(),
            None => Err(DirectionsError::Provider(format!(
                "no mock data for mode {mode}"
            ))),
        }
    }
}

/// Geocoder answering from a fixed table of exact coordinates.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    addresses: Vec<(Coordinate, String)>,
    unavailable: bool,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A geocoder whose every lookup fails.
    pub fn unavailable() -> Self {
        Self {
            addresses: Vec::new(),
            unavailable: true,
        }
    }

    /// Register the address for an exact coordinate.
    pub fn with_address(mut self, coordinate: Coordinate, address: impl Into<String>) -> Self {
        self.addresses.push((coordinate, address.into()));
        self
    }
}

impl Geocoder for StaticGeocoder {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError> {
        if self.unavailable {
            return Err(GeocodeError::Unavailable("static geocoder offline".to_string()));
        }

        Ok(self
            .addresses
            .iter()
            .find(|(c, _)| *c == coordinate)
            .map(|(_, address)| address.clone()))
    }
}

/// Location provider reporting a fixed position, or none.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLocation {
    location: Option<Coordinate>,
}

impl StaticLocation {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            location: Some(coordinate),
        }
    }

    pub fn unavailable() -> Self {
        Self { location: None }
    }
}

impl LocationProvider for StaticLocation {
    async fn current_location(&self) -> Result<Coordinate, LocationError> {
        self.location.ok_or(LocationError::Unavailable)
    }
}
