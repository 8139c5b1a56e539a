//! Embedding provider trait.
//!
//! A provider maps a batch of strings to a matrix with one row per string.
//! A row of zeros means the provider has no representation for that input;
//! callers drop such rows before ranking.
//!
//! Implementations:
//! - `WordVectorEmbedder`: mean of static word vectors loaded from a text file
//! - `OnnxEmbedder`: sentence-transformer model via ONNX Runtime (`onnx` feature)
//! - `CachedEmbedder`: LRU cache in front of any other provider

use std::sync::Arc;

use embedrank_core::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1};

/// Trait for embedding backends.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed every input in one call. The result has `texts.len()` rows.
    ///
    /// Fails with `Error::InvalidInput` when an input contains a character
    /// the model cannot accept, such as a newline.
    fn embed_batch(&self, texts: &[&str]) -> Result<Array2<f32>>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a single string.
    fn embed(&self, text: &str) -> Result<Array1<f32>> {
        let matrix = self.embed_batch(&[text])?;
        if matrix.nrows() != 1 {
            return Err(Error::DimensionMismatch {
                expected: 1,
                actual: matrix.nrows(),
            });
        }
        Ok(matrix.row(0).to_owned())
    }
}

impl<E: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<E> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Array2<f32>> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

impl<E: EmbeddingProvider + ?Sized> EmbeddingProvider for &E {
    fn embed_batch(&self, texts: &[&str]) -> Result<Array2<f32>> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Reject inputs that would be split into several sentences by the model.
pub fn check_input(text: &str) -> Result<()> {
    if text.contains('\n') {
        return Err(Error::InvalidInput(format!(
            "new line is not allowed inside a sentence: {:?}",
            text
        )));
    }
    Ok(())
}

/// Whether a row is the all-zero "unknown input" vector.
pub fn is_unknown(row: ArrayView1<'_, f32>) -> bool {
    row.iter().all(|&v| v == 0.0)
}
