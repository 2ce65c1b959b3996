//! Domain error types.
//!
//! These errors represent validation failures when building domain values
//! from external data (fixtures, user input). They are distinct from
//! provider and session errors.

use super::{InvalidCoordinate, UnknownMode};

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Coordinate out of range or malformed
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    /// Unknown transport mode name
    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),

    /// Route with invalid distance or duration
    #[error("invalid route: {0}")]
    InvalidRoute(&'static str),
}
