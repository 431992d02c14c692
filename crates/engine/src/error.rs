//! Error types for the engine crate.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by data sources feeding the engine.
///
/// These never abort a search: a failed manifest falls back to the built-in
/// tag list and a failed shard contributes zero offers. They exist so that
/// [`ShardSource`](crate::ShardSource) implementations have a uniform error
/// channel for the catalog loader to log.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A data shard or manifest could not be fetched.
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),

    /// A fetched document did not match the expected shape.
    #[error("data parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
