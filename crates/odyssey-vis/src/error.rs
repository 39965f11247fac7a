//! Error types for playback and serving.

use thiserror::Error;

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around playback.
///
/// The playback engine itself never fails; these come from trace generation,
/// the player task and configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Trace generation rejected the request
    #[error(transparent)]
    Trace(#[from] odyssey_trace::Error),

    /// The player task has shut down
    #[error("player task is no longer running")]
    PlayerClosed,

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
