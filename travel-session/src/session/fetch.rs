//! Outstanding requests and their completions.
//!
//! Issuing a request is a synchronous transition on the session that returns
//! a `Fetch`. Running a fetch borrows only the collaborators, so any number
//! can be in flight at once. Its `Completion` carries the original request,
//! tag included, back to the session, which drops it unless the tag is
//! still the current one for its kind.

use std::fmt;

use tracing::debug;

use crate::directions::{
    DirectionsError, DirectionsProvider, Geocoder, LocationError, LocationProvider, best_route,
};
use crate::domain::{Coordinate, Route, RouteOptionSet, TransportMode};

use super::options::{fetch_mode_alternatives, fetch_options};
use super::picks::PickSlot;

/// Monotonic id stamped on a request when it is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTag(u64);

impl fmt::Display for RequestTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of request tags. Never hands out the same tag twice.
#[derive(Debug, Default)]
pub(crate) struct TagCounter {
    last: u64,
}

impl TagCounter {
    pub(crate) fn next(&mut self) -> RequestTag {
        self.last += 1;
        RequestTag(self.last)
    }
}

/// The collaborators a fetch runs against.
#[derive(Debug, Clone)]
pub struct Services<D, G, L> {
    pub directions: D,
    pub geocoder: G,
    pub location: L,
}

impl<D, G, L> Services<D, G, L> {
    pub fn new(directions: D, geocoder: G, location: L) -> Self {
        Self {
            directions,
            geocoder,
            location,
        }
    }
}

/// Single best route for the picks and mode active at issue time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub tag: RequestTag,
    pub start: Coordinate,
    pub end: Coordinate,
    pub mode: TransportMode,
}

/// One route per mode for the options panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionsRequest {
    pub tag: RequestTag,
    pub start: Coordinate,
    pub end: Coordinate,
}

/// Ranked alternatives of the current mode, for the route details list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlternativesRequest {
    pub tag: RequestTag,
    pub start: Coordinate,
    pub end: Coordinate,
    pub mode: TransportMode,
    pub limit: usize,
}

/// Display address for a freshly resolved pick.
///
/// Not tagged: the coordinate itself identifies the pick it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddressRequest {
    pub slot: PickSlot,
    pub coordinate: Coordinate,
}

/// Current device location, to be used as the start pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationRequest {
    pub tag: RequestTag,
}

/// A request the session wants run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fetch {
    Route(RouteRequest),
    Options(OptionsRequest),
    Alternatives(AlternativesRequest),
    Address(AddressRequest),
    Location(LocationRequest),
}

/// A settled request, ready to be applied to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Route(RouteRequest, Result<Route, DirectionsError>),
    Options(OptionsRequest, RouteOptionSet),
    Alternatives(AlternativesRequest, Result<Vec<Route>, DirectionsError>),
    Address(AddressRequest, String),
    Location(LocationRequest, Result<Coordinate, LocationError>),
}

impl Fetch {
    /// Run the request against the collaborators.
    ///
    /// Never fails: errors travel inside the completion so the session can
    /// decide how to surface them.
    pub async fn run<D, G, L>(self, services: &Services<D, G, L>) -> Completion
    where
        D: DirectionsProvider,
        G: Geocoder,
        L: LocationProvider,
    {
        match self {
            Fetch::Route(request) => {
                let result =
                    best_route(&services.directions, request.start, request.end, request.mode)
                        .await;
                Completion::Route(request, result)
            }
            Fetch::Options(request) => {
                let options = fetch_options(&services.directions, request.start, request.end).await;
                Completion::Options(request, options)
            }
            Fetch::Alternatives(request) => {
                let result = fetch_mode_alternatives(
                    &services.directions,
                    request.start,
                    request.end,
                    request.mode,
                    request.limit,
                )
                .await;
                Completion::Alternatives(request, result)
            }
            Fetch::Address(request) => {
                let address = match services.geocoder.reverse_geocode(request.coordinate).await {
                    Ok(address) => address.unwrap_or_default(),
                    Err(e) => {
                        debug!(
                            coordinate = %request.coordinate,
                            error = %e,
                            "Reverse geocoding failed, using empty address"
                        );
                        String::new()
                    }
                };
                Completion::Address(request, address)
            }
            Fetch::Location(request) => {
                let result = services.location.current_location().await;
                Completion::Location(request, result)
            }
        }
    }
}
