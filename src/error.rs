//! Error types for spherical Voronoi generation

use thiserror::Error;

/// Errors that can occur while validating input or assembling meshes
///
/// Numerical degeneracies inside the sweep (zero-area site triples, `asin`
/// overshoot) are absorbed by guards and clamping and never show up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A site vector is non-finite or has zero length
    #[error("site {index} is not a finite, non-zero vector")]
    InvalidSite { index: usize },
    /// A site is not unit length and the strict site policy is active
    #[error("site {index} has length {length}, expected a unit vector")]
    NotNormalized { index: usize, length: f64 },
    /// Two sites land on the same point of the sphere
    #[error("sites {first} and {second} coincide")]
    CoincidentSites { first: usize, second: usize },
    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),
    /// The mesh has more vertices than the index type can address
    #[error("mesh has {vertices} vertices, more than the index type can address")]
    IndexOverflow { vertices: usize },
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            VoronoiError::CoincidentSites { first: 2, second: 7 }.to_string(),
            "sites 2 and 7 coincide"
        );
        assert_eq!(
            VoronoiError::IndexOverflow { vertices: 70_000 }.to_string(),
            "mesh has 70000 vertices, more than the index type can address"
        );
    }
}
