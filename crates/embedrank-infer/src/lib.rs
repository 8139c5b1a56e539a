//! EmbedRank Infer: embedding providers.
//!
//! Provides the `EmbeddingProvider` trait the ranking core consumes, a
//! word-vector provider that works without any runtime, an ONNX provider
//! behind the `onnx` feature, and a caching wrapper for either.

pub mod cache;
pub mod embedder;
pub mod onnx_embedder;
pub mod word_vectors;

pub use cache::{CachedEmbedder, EmbeddingCache};
pub use embedder::{check_input, is_unknown, EmbeddingProvider};
pub use word_vectors::WordVectorEmbedder;

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::sync::Arc;
use std::time::Duration;

use embedrank_core::{EmbeddingBackend, EmbeddingConfig, Error, Result};

/// Create the embedding provider described by `config`, cached when
/// `config.cache_size > 0`.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let path = config.path.as_deref().ok_or_else(|| {
        Error::Config("embedding path is required (set embedding.path or EMBEDRANK_VECTORS)".into())
    })?;

    let cache = (config.cache_size > 0).then(|| {
        EmbeddingCache::new(config.cache_size, Duration::from_secs(config.cache_ttl_secs))
    });

    match config.backend {
        EmbeddingBackend::WordVectors => {
            let embedder = WordVectorEmbedder::load(path)?;
            Ok(with_cache(embedder, cache))
        }
        EmbeddingBackend::Onnx => {
            #[cfg(feature = "onnx")]
            {
                let embedder = OnnxEmbedder::load(path)?;
                Ok(with_cache(embedder, cache))
            }
            #[cfg(not(feature = "onnx"))]
            {
                let _ = cache;
                Err(Error::Config(
                    "ONNX backend requested but the `onnx` feature is disabled".into(),
                ))
            }
        }
    }
}

fn with_cache<E: EmbeddingProvider + 'static>(
    embedder: E,
    cache: Option<EmbeddingCache>,
) -> Arc<dyn EmbeddingProvider> {
    match cache {
        Some(cache) => {
            tracing::debug!("Embedding cache enabled");
            Arc::new(CachedEmbedder::new(embedder, cache))
        }
        None => Arc::new(embedder),
    }
}
