//! EmbedRank Core: error type and configuration shared by all crates.

pub mod config;
pub mod error;

pub use config::{
    ChunkerConfig, EmbedRankConfig, EmbeddingBackend, EmbeddingConfig, ExtractionConfig,
    ExtractionMode, TextConfig, DEFAULT_ALIAS_THRESHOLD, DEFAULT_BETA, DEFAULT_CANDIDATE_TAGS,
    TOO_SHORT_TAG,
};
pub use error::{Error, Result};
