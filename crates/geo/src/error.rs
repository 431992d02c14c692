//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur while obtaining the centroid index.
///
/// Lookups themselves never error: a missing or unloadable index degrades
/// to `None` results. These errors surface only from a [`CentroidSource`]
/// fetch and are logged, not propagated, by the index service.
///
/// [`CentroidSource`]: crate::CentroidSource
#[derive(Debug, Error)]
pub enum GeoError {
    /// The centroid index could not be fetched.
    #[error("centroid index unavailable: {0}")]
    SourceUnavailable(String),

    /// The fetched index did not match the expected shape.
    #[error("centroid index parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
