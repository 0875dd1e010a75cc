//! Error type used by the crate.

use thiserror::Error;

/// Errors of constructing or evaluating a map projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Projection parameters are missing or inconsistent. Returned only when a projection is constructed.
    #[error("invalid projection parameters: {0}")]
    InvalidParameters(String),
    /// Iterative inverse projection did not reach the required precision.
    #[error("inverse projection did not converge after {iterations} iterations")]
    NonConvergence {
        /// Number of iterations done before giving up.
        iterations: usize,
    },
    /// Input coordinates cannot be projected (e.g. a pole in Mercator, or a non-finite value).
    #[error("coordinates are outside of the projection domain")]
    OutOfDomain,
    /// The coordinate system uses a projection that is not implemented.
    #[error("unsupported projection: {0}")]
    Unsupported(String),
}
