//! Embedding lookup for a document and its candidates.
//!
//! Candidates are embedded with one batched provider call. Candidates whose
//! row comes back all zero are unknown to the model and are dropped together
//! with their row, so `candidates[i]` always matches `embeddings.row(i)`.

use embedrank_core::{ChunkerConfig, Error, Result};
use embedrank_infer::{is_unknown, EmbeddingProvider};
use embedrank_text::{extract_candidates, extract_sentence_candidates, TextRepresentation};
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

/// Candidates and their embeddings, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEmbeddings {
    pub candidates: Vec<String>,
    pub embeddings: Array2<f32>,
}

impl CandidateEmbeddings {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Embedding of the whole document, from all tokens or candidate tokens only.
pub fn extract_doc_embedding<P: EmbeddingProvider + ?Sized>(
    provider: &P,
    repr: &TextRepresentation,
    use_filtered: bool,
) -> Result<Array1<f32>> {
    let text = repr.document_text(use_filtered);
    let matrix = provider.embed_batch(&[text.as_str()])?;
    if matrix.nrows() != 1 {
        return Err(Error::DimensionMismatch {
            expected: 1,
            actual: matrix.nrows(),
        });
    }
    Ok(matrix.row(0).to_owned())
}

/// Noun-phrase candidates of the document that the model can embed.
pub fn extract_candidates_embedding_for_doc<P: EmbeddingProvider + ?Sized>(
    provider: &P,
    repr: &TextRepresentation,
    chunker: &ChunkerConfig,
) -> Result<CandidateEmbeddings> {
    embed_candidates(provider, extract_candidates(repr, chunker)?)
}

/// Sentences of the document that the model can embed.
pub fn extract_sent_candidates_embedding_for_doc<P: EmbeddingProvider + ?Sized>(
    provider: &P,
    repr: &TextRepresentation,
) -> Result<CandidateEmbeddings> {
    embed_candidates(provider, extract_sentence_candidates(repr))
}

fn embed_candidates<P: EmbeddingProvider + ?Sized>(
    provider: &P,
    candidates: Vec<String>,
) -> Result<CandidateEmbeddings> {
    if candidates.is_empty() {
        return Ok(CandidateEmbeddings {
            candidates,
            embeddings: Array2::zeros((0, provider.dimension())),
        });
    }

    let texts: Vec<&str> = candidates.iter().map(String::as_str).collect();
    let embeddings = provider.embed_batch(&texts)?;
    if embeddings.nrows() != candidates.len() {
        return Err(Error::DimensionMismatch {
            expected: candidates.len(),
            actual: embeddings.nrows(),
        });
    }

    let keep: Vec<usize> = embeddings
        .rows()
        .into_iter()
        .enumerate()
        .filter(|(_, row)| !is_unknown(*row))
        .map(|(i, _)| i)
        .collect();

    let dropped = candidates.len() - keep.len();
    if dropped > 0 {
        warn!("Dropped {} candidates unknown to the embedding model", dropped);
    }
    debug!("{} candidates embedded", keep.len());

    if dropped == 0 {
        return Ok(CandidateEmbeddings {
            candidates,
            embeddings,
        });
    }

    let embeddings = embeddings.select(Axis(0), &keep);
    let mut candidates: Vec<Option<String>> = candidates.into_iter().map(Some).collect();
    let candidates = keep.iter().filter_map(|&i| candidates[i].take()).collect();

    Ok(CandidateEmbeddings {
        candidates,
        embeddings,
    })
}
