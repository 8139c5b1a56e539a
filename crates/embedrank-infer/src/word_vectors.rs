//! Static word-vector embedder.
//!
//! Loads vectors in the word2vec/fastText text format (`word v1 v2 ... vD`,
//! optionally preceded by a `count dim` header line) and embeds a string as
//! the mean of the vectors of its whitespace-separated words. A string with
//! no known word embeds to the zero vector.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use embedrank_core::{Error, Result};
use ndarray::{Array1, Array2};
use tracing::{debug, info};

use crate::embedder::{check_input, EmbeddingProvider};

/// Mean-of-word-vectors embedding provider.
pub struct WordVectorEmbedder {
    vectors: HashMap<String, Array1<f32>>,
    dimension: usize,
}

impl WordVectorEmbedder {
    /// Build from in-memory vectors. Every vector must have `dimension` entries.
    pub fn from_vectors<I, S>(dimension: usize, vectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut map = HashMap::new();
        for (word, values) in vectors {
            if values.len() != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    actual: values.len(),
                });
            }
            map.insert(word.into(), Array1::from_vec(values));
        }
        Ok(Self {
            vectors: map,
            dimension,
        })
    }

    /// Load a word2vec/fastText text file.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut vectors = HashMap::new();
        let mut dimension = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let values: Vec<&str> = parts.collect();

            // "count dim" header
            if line_no == 0 && values.len() == 1 && word.parse::<usize>().is_ok() {
                if let Ok(dim) = values[0].parse::<usize>() {
                    dimension = Some(dim);
                    continue;
                }
            }

            let values = values
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| {
                    Error::Inference(format!(
                        "{}:{}: invalid vector component: {}",
                        path.display(),
                        line_no + 1,
                        e
                    ))
                })?;

            let dim = *dimension.get_or_insert(values.len());
            if values.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: values.len(),
                });
            }
            vectors.insert(word.to_string(), Array1::from_vec(values));
        }

        let dimension = dimension
            .filter(|&d| d > 0)
            .ok_or_else(|| Error::Inference(format!("{}: no word vectors found", path.display())))?;

        info!(
            "Word vectors loaded: {} words, dim={}, file={}",
            vectors.len(),
            dimension,
            path.display()
        );

        Ok(Self {
            vectors,
            dimension,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectors.len()
    }

    fn lookup(&self, word: &str) -> Option<&Array1<f32>> {
        self.vectors
            .get(word)
            .or_else(|| self.vectors.get(&word.to_lowercase()))
    }

    /// Mean of the known word vectors of `text`, or zeros.
    fn embed_text(&self, text: &str) -> Array1<f32> {
        let mut sum = Array1::zeros(self.dimension);
        let mut known = 0usize;
        for word in text.split_whitespace() {
            if let Some(v) = self.lookup(word) {
                sum += v;
                known += 1;
            }
        }
        if known > 0 {
            sum /= known as f32;
        }
        sum
    }
}

impl EmbeddingProvider for WordVectorEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Array2<f32>> {
        for text in texts {
            check_input(text)?;
        }

        let mut matrix = Array2::zeros((texts.len(), self.dimension));
        for (mut row, text) in matrix.rows_mut().into_iter().zip(texts) {
            row.assign(&self.embed_text(text));
        }
        debug!("Embedded {} texts with word vectors", texts.len());
        Ok(matrix)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
