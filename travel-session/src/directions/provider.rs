//! Collaborator traits.
//!
//! The session never talks to a network or a device directly. It goes
//! through these traits, so it can be driven by the fixture mock in tests
//! and by real services elsewhere. All methods are async and callers may
//! issue a new request before an earlier one has resolved.

use std::future::Future;

use crate::domain::{Coordinate, Route, TransportMode};

use super::error::{DirectionsError, GeocodeError, LocationError};

/// Source of routes between two coordinates.
pub trait DirectionsProvider {
    /// Request ranked route candidates, best first.
    ///
    /// An empty list means the provider found nothing; callers that need a
    /// single route should go through [`best_route`].
    fn request_route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> impl Future<Output = Result<Vec<Route>, DirectionsError>>;
}

/// Address lookup for a coordinate.
pub trait Geocoder {
    /// Street-level address for the coordinate, or `None` if there is none.
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<Option<String>, GeocodeError>>;
}

/// Current position of the device.
pub trait LocationProvider {
    fn current_location(&self) -> impl Future<Output = Result<Coordinate, LocationError>>;
}

/// Fetch the single best route for a mode.
///
/// Fails with `NoRouteFound` when the provider returns no candidates, and
/// with `ModeMismatch` when the best candidate is for another mode.
pub async fn best_route<P: DirectionsProvider>(
    provider: &P,
    from: Coordinate,
    to: Coordinate,
    mode: TransportMode,
) -> Result<Route, DirectionsError> {
    let routes = provider.request_route(from, to, mode).await?;
    let route = routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRouteFound { mode })?;

    if route.mode() != mode {
        return Err(DirectionsError::ModeMismatch {
            requested: mode,
            returned: route.mode(),
        });
    }

    Ok(route)
}
