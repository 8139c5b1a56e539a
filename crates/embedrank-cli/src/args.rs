//! Clap argument definitions for the `embedrank` CLI.

use std::path::PathBuf;

use clap::Parser;
use embedrank_core::{EmbedRankConfig, EmbeddingBackend, ExtractionMode};

fn parse_mode(s: &str) -> Result<ExtractionMode, String> {
    s.parse().map_err(|e: embedrank_core::Error| e.to_string())
}

fn parse_backend(s: &str) -> Result<EmbeddingBackend, String> {
    s.parse().map_err(|e: embedrank_core::Error| e.to_string())
}

/// Extract keyphrases from POS-tagged text (`word|TAG` tokens, sentences
/// separated by `[ENDSENT]`).
#[derive(Parser, Debug)]
#[command(name = "embedrank")]
#[command(about = "EmbedRank - embedding-based keyphrase extraction")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Tagged text to process
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// File of tagged text (stdin when neither --text nor --file is given)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Treat each non-empty input line as a separate document
    #[arg(long)]
    pub lines: bool,

    /// Number of keyphrases to return [default: 10]
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Relevance/diversity trade-off in [0, 1] [default: 0.55]
    #[arg(long)]
    pub beta: Option<f64>,

    /// Cosine similarity at which a candidate becomes an alias [default: 0.7]
    #[arg(long)]
    pub alias_threshold: Option<f64>,

    /// Rank noun phrases ("phrase") or whole sentences ("sentence")
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<ExtractionMode>,

    /// Stem tokens instead of lower-casing them
    #[arg(long)]
    pub stem: bool,

    /// Drop candidates contained as whole words in a longer candidate
    #[arg(long)]
    pub no_subset: bool,

    /// Embed the document from candidate words only
    #[arg(long)]
    pub use_filtered: bool,

    /// Word-vector file or ONNX model directory
    #[arg(long)]
    pub vectors: Option<PathBuf>,

    /// Embedding backend: word_vectors or onnx
    #[arg(long, value_parser = parse_backend)]
    pub backend: Option<EmbeddingBackend>,

    /// Embedding cache entries (0 disables the cache)
    #[arg(long)]
    pub cache_size: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v for debug, -vv for trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings.
    pub fn apply(&self, config: &mut EmbedRankConfig) {
        let extraction = &mut config.extraction;
        if let Some(n) = self.top_n {
            extraction.top_n = n;
        }
        if let Some(beta) = self.beta {
            extraction.beta = beta;
        }
        if let Some(threshold) = self.alias_threshold {
            extraction.alias_threshold = threshold;
        }
        if let Some(mode) = self.mode {
            extraction.mode = mode;
        }
        if self.stem {
            extraction.text.stem = true;
        }
        if self.no_subset {
            extraction.chunker.no_subset = true;
        }
        if self.use_filtered {
            extraction.use_filtered = true;
        }

        let embedding = &mut config.embedding;
        if let Some(path) = &self.vectors {
            embedding.path = Some(path.clone());
        }
        if let Some(backend) = self.backend {
            embedding.backend = backend;
        }
        if let Some(size) = self.cache_size {
            embedding.cache_size = size;
        }
    }

    /// Default log level when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
