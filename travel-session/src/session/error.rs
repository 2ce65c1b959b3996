//! Session-level errors shown to the user.

use crate::directions::DirectionsError;

/// Errors surfaced by the session for display.
///
/// None of these is fatal; each is cleared by retrying the triggering
/// action (re-picking, changing mode, reopening options).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// Options were requested before both picks were present
    #[error("select both a start and an end location first")]
    PicksIncomplete,

    /// Every per-mode request of an options fetch failed
    #[error("no route options are available for any transport mode")]
    AllModesFailed,

    /// The single-route fetch failed
    #[error(transparent)]
    Directions(#[from] DirectionsError),
}
