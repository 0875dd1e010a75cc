//! Error types used by the crate.

use thiserror::Error;

/// Meridian error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeridianError {
    /// Envelope is empty or has non-finite coordinates and cannot be stored in a spatial index.
    #[error("envelope is empty or not finite")]
    InvalidEnvelope,
    /// Node capacity of a spatial index is too small.
    #[error("invalid node capacity")]
    InvalidCapacity,
    /// Linear location does not describe a point of a line.
    #[error("invalid linear location: {0}")]
    InvalidLocation(String),
    /// Object with the given id is not known to the object lookup.
    #[error("unknown object id: {0}")]
    UnknownId(u64),
}
