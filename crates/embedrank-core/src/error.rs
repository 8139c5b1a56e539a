//! Error types for EmbedRank.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The embedding provider refused an input string.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A token in externally supplied tagged text could not be parsed.
    #[error("Malformed tagged token {token:?}: {reason}")]
    TaggedText { token: String, reason: String },

    #[error("Unknown extraction mode: {0} (expected \"phrase\" or \"sentence\")")]
    UnknownMode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
