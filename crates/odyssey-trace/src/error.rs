//! Error types for trace generation.

use thiserror::Error;

/// Result type for trace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a trace.
///
/// All of these are caller contract violations. A generator never reports an
/// error for a well-formed seed, and degenerate inputs (empty, singleton,
/// target absent) are handled inside the trace rather than here.
#[derive(Debug, Error)]
pub enum Error {
    /// The seed has the wrong shape for the requested algorithm.
    #[error("invalid seed for {algorithm}: expected {expected}, got {found}")]
    InvalidSeed {
        algorithm: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The seed exceeds the bound the generator simulates over.
    #[error("seed for {algorithm} has {len} values, limit is {max}")]
    SeedTooLarge {
        algorithm: &'static str,
        len: usize,
        max: usize,
    },

    /// A graph seed references nodes that do not exist.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// No generator is registered under this id.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The category name is not one of the known families.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// A recorder was finished without any snapshots.
    #[error("generator {0} produced no snapshots")]
    EmptyTrace(String),

    /// Catalog or seed JSON could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
