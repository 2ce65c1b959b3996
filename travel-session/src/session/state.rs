//! Session state.

use crate::domain::{Route, TransportMode};

use super::error::SessionError;
use super::picks::LocationPicks;

/// Everything the user has chosen and what the map currently shows.
///
/// Created once per session, mutated in place by the controller, never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub picks: LocationPicks,
    pub mode: TransportMode,
    pub displayed_route: Option<Route>,
    pub last_error: Option<SessionError>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
