//! Maximal Marginal Relevance selection.
//!
//! ```text
//! MMR(c) = beta * sim(c, doc) - (1 - beta) * max_{s in S} sim(c, s)
//! ```
//!
//! The first pick is the candidate most similar to the document. Each later
//! pick maximizes MMR over the remaining candidates. `beta = 1` ranks by
//! relevance alone; `beta = 0` ranks by diversity alone.
//!
//! Ties go to the lowest candidate index, so the selection is a pure function
//! of its inputs.

use embedrank_core::{Error, Result};
use ndarray::{ArrayView1, ArrayView2};

use crate::similarity::{cosine_similarity, cosine_to_rows};

/// One selected candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Row of the candidate in the embedding matrix.
    pub index: usize,
    /// Marginal score at the time of selection (relevance for the first pick).
    pub score: f64,
    /// Cosine similarity to the document.
    pub relevance: f64,
}

/// Greedily select up to `top_n` rows of `embeddings`.
pub fn select(
    document: ArrayView1<'_, f32>,
    embeddings: ArrayView2<'_, f32>,
    top_n: usize,
    beta: f64,
) -> Result<Vec<Selection>> {
    if !(0.0..=1.0).contains(&beta) {
        return Err(Error::Config(format!("beta must be in [0, 1], got {}", beta)));
    }

    let n = embeddings.nrows();
    if n == 0 || top_n == 0 {
        return Ok(Vec::new());
    }
    if document.len() != embeddings.ncols() {
        return Err(Error::DimensionMismatch {
            expected: embeddings.ncols(),
            actual: document.len(),
        });
    }

    let k = top_n.min(n);
    let relevance = cosine_to_rows(embeddings, document);

    // Max similarity of each candidate to the selected set, updated per pick
    let mut redundancy = vec![f64::NEG_INFINITY; n];
    let mut remaining = vec![true; n];
    let mut selected: Vec<Selection> = Vec::with_capacity(k);

    let first = argmax((0..n).map(|i| (i, relevance[i])));
    let Some(first) = first else {
        return Ok(selected);
    };
    selected.push(Selection {
        index: first,
        score: relevance[first],
        relevance: relevance[first],
    });
    remaining[first] = false;

    while selected.len() < k {
        let last = selected[selected.len() - 1].index;
        for i in (0..n).filter(|&i| remaining[i]) {
            let sim = cosine_similarity(embeddings.row(i), embeddings.row(last));
            if sim > redundancy[i] {
                redundancy[i] = sim;
            }
        }

        let best = argmax(
            (0..n)
                .filter(|&i| remaining[i])
                .map(|i| (i, beta * relevance[i] - (1.0 - beta) * redundancy[i])),
        );
        let Some(best) = best else {
            break;
        };

        selected.push(Selection {
            index: best,
            score: beta * relevance[best] - (1.0 - beta) * redundancy[best],
            relevance: relevance[best],
        });
        remaining[best] = false;
    }

    Ok(selected)
}

/// Select candidates by name: `(candidate, score)` in selection order.
pub fn select_candidates(
    document: ArrayView1<'_, f32>,
    candidates: &[String],
    embeddings: ArrayView2<'_, f32>,
    top_n: usize,
    beta: f64,
) -> Result<Vec<(String, f64)>> {
    if candidates.len() != embeddings.nrows() {
        return Err(Error::DimensionMismatch {
            expected: candidates.len(),
            actual: embeddings.nrows(),
        });
    }
    Ok(select(document, embeddings, top_n, beta)?
        .into_iter()
        .map(|s| (candidates[s.index].clone(), s.score))
        .collect())
}

/// First index with the strictly greatest score; NaN scores never win.
fn argmax(scores: impl Iterator<Item = (usize, f64)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores {
        match best {
            Some((_, b)) if score <= b || score.is_nan() => {}
            None if score.is_nan() => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
