//! Error types for the overlay core.

use thiserror::Error;

/// Top-level error type for all overlay-core operations.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A static-data lookup failed (unknown dungeon, path, or item).
    #[error("Unknown {kind} id: {id}")]
    UnknownId {
        /// What kind of record was looked up.
        kind: &'static str,
        /// The id that had no match.
        id: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, OverlayError>;
