//! Collaborator error types.

use crate::domain::TransportMode;

/// Errors from a directions provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectionsError {
    /// Provider answered but had no route for the pair and mode
    #[error("no {mode} route found")]
    NoRouteFound { mode: TransportMode },

    /// Underlying request failed
    #[error("directions provider error: {0}")]
    Provider(String),

    /// Provider answered with a route for a different mode than requested
    #[error("requested a {requested} route but the provider returned {returned}")]
    ModeMismatch {
        requested: TransportMode,
        returned: TransportMode,
    },

    /// Fixture data could not be read or parsed
    #[error("fixture error in {path}: {message}")]
    Fixture { path: String, message: String },
}

/// Errors from the reverse geocoder. Never fatal: the address degrades to "".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    #[error("reverse geocoding unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the device location provider. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("device location unavailable")]
    Unavailable,
}
