//! Normalized view of a tagged document.
//!
//! Tokens are stored once, in document order. The full view slices that array
//! by sentence; the filtered view keeps indices of the candidate tokens, so
//! both views share storage and neither reorders tokens.

use std::collections::HashSet;
use std::ops::Range;

use embedrank_core::{TextConfig, TOO_SHORT_TAG};

use crate::stemmer;
use crate::tagged::{TaggedSentence, TaggedToken};

/// A tagged document after lower-casing (or stemming) and short-token marking.
#[derive(Debug, Clone)]
pub struct TextRepresentation {
    tokens: Vec<TaggedToken>,
    /// Token range of each sentence.
    sentences: Vec<Range<usize>>,
    /// Indices of candidate tokens, in order.
    filtered: Vec<usize>,
    /// Range of `filtered` belonging to each sentence.
    filtered_sentences: Vec<Range<usize>>,
}

impl TextRepresentation {
    /// Normalize `sentences` according to `config`.
    pub fn new(sentences: &[TaggedSentence], config: &TextConfig) -> Self {
        let total: usize = sentences.iter().map(Vec::len).sum();
        let mut tokens = Vec::with_capacity(total);
        let mut bounds = Vec::with_capacity(sentences.len());
        let mut filtered = Vec::new();
        let mut filtered_bounds = Vec::with_capacity(sentences.len());

        for sent in sentences {
            let start = tokens.len();
            let filtered_start = filtered.len();

            for token in sent {
                let word = if config.stem {
                    stemmer::stem(&token.word)
                } else {
                    token.word.to_lowercase()
                };
                let tag = if word.chars().count() < config.min_word_len {
                    TOO_SHORT_TAG.to_string()
                } else {
                    token.tag.clone()
                };

                if tag != TOO_SHORT_TAG && config.candidate_tags.contains(&tag) {
                    filtered.push(tokens.len());
                }
                tokens.push(TaggedToken { word, tag });
            }

            bounds.push(start..tokens.len());
            filtered_bounds.push(filtered_start..filtered.len());
        }

        Self {
            tokens,
            sentences: bounds,
            filtered,
            filtered_sentences: filtered_bounds,
        }
    }

    pub fn num_sentences(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Every normalized token, sentence by sentence.
    pub fn sentences(&self) -> impl Iterator<Item = &[TaggedToken]> + '_ {
        self.sentences.iter().map(move |r| &self.tokens[r.clone()])
    }

    /// Candidate tokens only, sentence by sentence.
    pub fn filtered_sentences(&self) -> impl Iterator<Item = Vec<&TaggedToken>> + '_ {
        self.filtered_sentences.iter().map(move |r| {
            self.filtered[r.clone()]
                .iter()
                .map(|&i| &self.tokens[i])
                .collect()
        })
    }

    /// Distinct candidate words, in order of first occurrence.
    pub fn candidate_words(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.filtered
            .iter()
            .map(|&i| self.tokens[i].word.as_str())
            .filter(|w| seen.insert(*w))
            .map(str::to_string)
            .collect()
    }

    /// Text embedded as the document: the chosen view joined by single spaces.
    pub fn document_text(&self, use_filtered: bool) -> String {
        let words: Vec<&str> = if use_filtered {
            self.filtered.iter().map(|&i| self.tokens[i].word.as_str()).collect()
        } else {
            self.tokens.iter().map(|t| t.word.as_str()).collect()
        };
        words.join(" ").to_lowercase()
    }
}
