//! Directions, geocoding and device location collaborators.
//!
//! The session treats all three as black boxes behind async traits:
//! - a directions provider returns ranked route candidates per mode
//! - a geocoder turns a coordinate into a street-level address
//! - a location provider reports where the device is
//!
//! Fixture-backed mocks are provided for development and tests.

mod error;
mod fixture;
mod mock;
mod provider;

pub use error::{DirectionsError, GeocodeError, LocationError};
pub use fixture::{RouteFixture, parse_fixture};
pub use mock::{MockDirections, StaticGeocoder, StaticLocation};
pub use provider::{DirectionsProvider, Geocoder, LocationProvider, best_route};
