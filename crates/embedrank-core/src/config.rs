//! Configuration values for extraction and embedding.
//!
//! Every default the pipeline relies on (candidate tag set, minimum word
//! length, MMR beta, alias threshold) lives here as a field, so callers can
//! override any of them per extraction.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// POS tags whose tokens may take part in a candidate phrase.
pub const DEFAULT_CANDIDATE_TAGS: &[&str] = &["NN", "NNS", "NNP", "NNPS", "JJ"];

/// Tag given to tokens shorter than `min_word_len`.
pub const TOO_SHORT_TAG: &str = "LESS";

/// Default MMR trade-off between informativeness and diversity.
pub const DEFAULT_BETA: f64 = 0.55;

/// Default minimum similarity for grouping an alias.
pub const DEFAULT_ALIAS_THRESHOLD: f64 = 0.7;

/// Normalization of tagged text before candidate extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Stem every token instead of lower-casing it.
    pub stem: bool,
    /// Tokens shorter than this (in characters) are never candidates.
    pub min_word_len: usize,
    /// Tags that mark a token as a candidate word.
    pub candidate_tags: BTreeSet<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            stem: false,
            min_word_len: 3,
            candidate_tags: DEFAULT_CANDIDATE_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Noun-phrase grammar: `(modifier | noun)* noun`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// A tag starting with this prefix is a noun (`NN`, `NNS`, `NNP`, ...).
    pub noun_tag_prefix: String,
    /// Tags allowed before the head noun besides nouns.
    pub modifier_tags: Vec<String>,
    /// Longer matches are discarded.
    pub max_tokens: usize,
    /// Drop candidates that appear as whole words inside a longer candidate.
    pub no_subset: bool,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            noun_tag_prefix: "NN".to_string(),
            modifier_tags: vec!["JJ".to_string()],
            max_tokens: 5,
            no_subset: false,
        }
    }
}

impl ChunkerConfig {
    pub fn is_noun(&self, tag: &str) -> bool {
        tag.starts_with(&self.noun_tag_prefix)
    }

    pub fn is_modifier(&self, tag: &str) -> bool {
        self.modifier_tags.iter().any(|t| t == tag)
    }
}

/// What gets ranked: noun-phrase candidates or whole sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ExtractionMode {
    #[default]
    Phrase,
    Sentence,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phrase => write!(f, "phrase"),
            Self::Sentence => write!(f, "sentence"),
        }
    }
}

impl FromStr for ExtractionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phrase" | "phrases" | "keyphrase" => Ok(Self::Phrase),
            "sentence" | "sentences" => Ok(Self::Sentence),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExtractionMode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Parameters of a single keyphrase extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Desired number of results; fewer are returned when the pool is small.
    pub top_n: usize,
    /// MMR weight of relevance against redundancy, in `[0, 1]`.
    pub beta: f64,
    /// Minimum cosine similarity for an unselected candidate to become an alias.
    pub alias_threshold: f64,
    pub mode: ExtractionMode,
    /// Embed the document from candidate words only.
    pub use_filtered: bool,
    pub text: TextConfig,
    pub chunker: ChunkerConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            beta: DEFAULT_BETA,
            alias_threshold: DEFAULT_ALIAS_THRESHOLD,
            mode: ExtractionMode::Phrase,
            use_filtered: false,
            text: TextConfig::default(),
            chunker: ChunkerConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Reject out-of-range parameters before any model is invoked.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::Config("top_n must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(Error::Config(format!("beta must be in [0, 1], got {}", self.beta)));
        }
        if !(0.0..=1.0).contains(&self.alias_threshold) {
            return Err(Error::Config(format!(
                "alias_threshold must be in [0, 1], got {}",
                self.alias_threshold
            )));
        }
        if self.chunker.max_tokens == 0 {
            return Err(Error::Config("chunker.max_tokens must be at least 1".into()));
        }
        if self.chunker.noun_tag_prefix.is_empty() {
            return Err(Error::Config("chunker.noun_tag_prefix must not be empty".into()));
        }
        Ok(())
    }
}

/// Which embedding provider to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum EmbeddingBackend {
    /// Mean of static word vectors from a word2vec/fastText text file.
    #[default]
    WordVectors,
    /// Sentence-transformer ONNX model directory (requires the `onnx` feature).
    Onnx,
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "word_vectors" | "vectors" => Ok(Self::WordVectors),
            "onnx" => Ok(Self::Onnx),
            other => Err(Error::Config(format!("unknown embedding backend: {other}"))),
        }
    }
}

impl TryFrom<String> for EmbeddingBackend {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Vector file for `word_vectors`, model directory for `onnx`.
    pub path: Option<PathBuf>,
    /// Entries kept by the embedding cache (0 disables it).
    pub cache_size: usize,
    pub cache_ttl_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::WordVectors,
            path: None,
            cache_size: 1000,
            cache_ttl_secs: 3600,
        }
    }
}

/// Top-level EmbedRank configuration, as read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedRankConfig {
    pub extraction: ExtractionConfig,
    pub embedding: EmbeddingConfig,
}

impl EmbedRankConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.extraction.validate()?;
        Ok(config)
    }

    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                debug!("Reading configuration from {}", p.display());
                let raw = std::fs::read_to_string(p)?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Override embedding settings from `EMBEDRANK_VECTORS` and `EMBEDRANK_BACKEND`.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("EMBEDRANK_VECTORS") {
            if !path.is_empty() {
                self.embedding.path = Some(PathBuf::from(path));
            }
        }
        if let Ok(backend) = std::env::var("EMBEDRANK_BACKEND") {
            if !backend.is_empty() {
                self.embedding.backend = backend.parse()?;
            }
        }
        Ok(())
    }
}
