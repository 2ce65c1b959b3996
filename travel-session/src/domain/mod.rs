//! Domain types for the route session.
//!
//! Coordinates, transport modes, routes and option sets. Types that carry
//! invariants enforce them at construction time, so the session can trust
//! any value it receives.

mod coordinate;
mod error;
mod mode;
mod options;
mod region;
mod route;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use error::DomainError;
pub use mode::{TransportMode, UnknownMode};
pub use options::{MAX_ROUTE_OPTIONS, RouteOptionSet};
pub use region::CameraRegion;
pub use route::{Route, RouteSummary};
