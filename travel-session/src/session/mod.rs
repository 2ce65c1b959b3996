//! Route-acquisition session.
//!
//! Turns two location picks and a transport mode into a fetched, displayed
//! and user-confirmed route. The session never awaits anything itself: each
//! user action returns the fetches it needs, and their completions are
//! applied back to it, tagged so that stale results are dropped.

mod config;
mod controller;
mod error;
mod fetch;
mod options;
mod picks;
mod state;

pub use config::SessionConfig;
pub use controller::RouteSession;
pub use error::SessionError;
pub use fetch::{
    AddressRequest, AlternativesRequest, Completion, Fetch, LocationRequest, OptionsRequest,
    RequestTag, RouteRequest, Services,
};
pub use options::{OptionsPanel, fetch_mode_alternatives, fetch_options, filter_by_mode};
pub use picks::{LocationPicks, Pick, PickSlot, PickTarget};
pub use state::SessionState;
