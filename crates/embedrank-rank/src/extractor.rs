//! Keyphrase extraction pipeline.
//!
//! raw text → tagged sentences → [`TextRepresentation`] → candidates →
//! embeddings → MMR selection → alias grouping → [`Keyphrase`] list.

use std::sync::Arc;

use embedrank_core::{ExtractionConfig, ExtractionMode, Result};
use embedrank_infer::EmbeddingProvider;
use embedrank_text::{PosTagger, TaggedSentence, TextRepresentation};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::alias::group_aliases;
use crate::lookup::{
    extract_candidates_embedding_for_doc, extract_doc_embedding,
    extract_sent_candidates_embedding_for_doc,
};
use crate::mmr;

/// A selected keyphrase (or sentence) with its near-duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyphrase {
    pub phrase: String,
    /// Marginal relevance when the phrase was selected.
    pub score: f64,
    /// Cosine similarity to the document.
    pub relevance: f64,
    pub aliases: Vec<String>,
}

/// Rank the candidates of an already-built representation.
pub fn rank_representation<P: EmbeddingProvider + ?Sized>(
    embedder: &P,
    repr: &TextRepresentation,
    config: &ExtractionConfig,
) -> Result<Vec<Keyphrase>> {
    config.validate()?;
    if repr.is_empty() {
        debug!("Empty document; nothing to rank");
        return Ok(Vec::new());
    }

    let pool = match config.mode {
        ExtractionMode::Phrase => {
            extract_candidates_embedding_for_doc(embedder, repr, &config.chunker)?
        }
        ExtractionMode::Sentence => extract_sent_candidates_embedding_for_doc(embedder, repr)?,
    };

    if pool.is_empty() {
        debug!("No embeddable candidates; nothing to rank");
        return Ok(Vec::new());
    }

    let document = extract_doc_embedding(embedder, repr, config.use_filtered)?;
    let selections = mmr::select(
        document.view(),
        pool.embeddings.view(),
        config.top_n,
        config.beta,
    )?;

    let selected: Vec<usize> = selections.iter().map(|s| s.index).collect();
    let aliases = group_aliases(&selected, pool.embeddings.view(), config.alias_threshold);

    debug!(
        "Selected {} of {} candidates (mode={}, beta={})",
        selections.len(),
        pool.len(),
        config.mode,
        config.beta
    );

    Ok(selections
        .iter()
        .zip(aliases)
        .map(|(s, alias_rows)| Keyphrase {
            phrase: pool.candidates[s.index].clone(),
            score: s.score,
            relevance: s.relevance,
            aliases: alias_rows
                .into_iter()
                .map(|i| pool.candidates[i].clone())
                .collect(),
        })
        .collect())
}

/// Tag `raw_text` and extract its keyphrases.
pub fn extract_keyphrases<P, T>(
    embedder: &P,
    tagger: &T,
    raw_text: &str,
    config: &ExtractionConfig,
) -> Result<Vec<Keyphrase>>
where
    P: EmbeddingProvider + ?Sized,
    T: PosTagger + ?Sized,
{
    config.validate()?;
    let sentences = tagger.pos_tag(raw_text)?;
    let repr = TextRepresentation::new(&sentences, &config.text);
    rank_representation(embedder, &repr, config)
}

/// Long-lived extractor sharing one embedding provider and tagger.
pub struct KeyphraseExtractor {
    embedder: Arc<dyn EmbeddingProvider>,
    tagger: Arc<dyn PosTagger>,
    config: ExtractionConfig,
}

impl KeyphraseExtractor {
    /// Create an extractor. Fails if `config` is invalid.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        tagger: Arc<dyn PosTagger>,
        config: ExtractionConfig,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            "Keyphrase extractor ready: mode={}, top_n={}, beta={}, alias_threshold={}, dim={}",
            config.mode,
            config.top_n,
            config.beta,
            config.alias_threshold,
            embedder.dimension()
        );
        Ok(Self {
            embedder,
            tagger,
            config,
        })
    }

    /// Extract keyphrases from raw text.
    pub fn extract(&self, raw_text: &str) -> Result<Vec<Keyphrase>> {
        extract_keyphrases(self.embedder.as_ref(), self.tagger.as_ref(), raw_text, &self.config)
    }

    /// Extract keyphrases from sentences tagged elsewhere.
    pub fn extract_tagged(&self, sentences: &[TaggedSentence]) -> Result<Vec<Keyphrase>> {
        let repr = TextRepresentation::new(sentences, &self.config.text);
        rank_representation(self.embedder.as_ref(), &repr, &self.config)
    }

    /// Extract from independent documents in parallel; results keep input order.
    pub fn extract_batch(&self, documents: &[&str]) -> Vec<Result<Vec<Keyphrase>>> {
        documents
            .par_iter()
            .map(|doc| self.extract(doc))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedrank_core::{Error, TextConfig};
    use embedrank_infer::WordVectorEmbedder;
    use embedrank_text::{parse_tagged_text, PreTaggedText};

    fn embedder() -> WordVectorEmbedder {
        WordVectorEmbedder::from_vectors(
            3,
            [
                ("graph", vec![1.0, 0.0, 0.0]),
                ("graphs", vec![0.98, 0.05, 0.0]),
                ("theory", vec![0.9, 0.1, 0.0]),
                ("trees", vec![0.2, 1.0, 0.0]),
                ("forests", vec![0.25, 0.95, 0.05]),
                ("music", vec![0.0, 0.0, 1.0]),
            ],
        )
        .unwrap()
    }

    const DOC: &str = "Graph|NN theory|NN studies|VBZ graphs|NNS .|.[ENDSENT]\
        Trees|NNS are|VBP graphs|NNS .|.[ENDSENT]\
        Forests|NNS contain|VBP trees|NNS .|.[ENDSENT]\
        Zorblax|NNP is|VBZ unknown|JJ .|.";

    #[test]
    fn test_extract_phrases() {
        let config = ExtractionConfig {
            top_n: 3,
            ..ExtractionConfig::default()
        };
        let result = extract_keyphrases(&embedder(), &PreTaggedText, DOC, &config).unwrap();

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|k| k.phrase != "zorblax"));
        // First pick is the most relevant, with score equal to relevance
        assert_eq!(result[0].score, result[0].relevance);
        assert!(result
            .iter()
            .all(|k| k.relevance >= -1.0 && k.relevance <= 1.0));
    }

    #[test]
    fn test_aliases_disjoint_and_unselected() {
        let config = ExtractionConfig {
            top_n: 2,
            alias_threshold: 0.9,
            ..ExtractionConfig::default()
        };
        let result = extract_keyphrases(&embedder(), &PreTaggedText, DOC, &config).unwrap();
        let selected: Vec<&str> = result.iter().map(|k| k.phrase.as_str()).collect();
        let mut seen = std::collections::HashSet::new();
        for k in &result {
            for alias in &k.aliases {
                assert!(!selected.contains(&alias.as_str()));
                assert!(seen.insert(alias.clone()));
            }
        }
    }

    #[test]
    fn test_sentence_mode() {
        let config = ExtractionConfig {
            top_n: 2,
            mode: ExtractionMode::Sentence,
            ..ExtractionConfig::default()
        };
        let result = extract_keyphrases(&embedder(), &PreTaggedText, DOC, &config).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|k| k.phrase.ends_with(" .")));
    }

    #[test]
    fn test_empty_document() {
        let result = extract_keyphrases(
            &embedder(),
            &PreTaggedText,
            "it|PRP is|VBZ .|.",
            &ExtractionConfig::default(),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_blank_input() {
        let result =
            extract_keyphrases(&embedder(), &PreTaggedText, " \n ", &ExtractionConfig::default())
                .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_tagging() {
        let config = ExtractionConfig {
            beta: 2.0,
            ..ExtractionConfig::default()
        };
        // Malformed input would fail in the tagger; config is checked first
        let err = extract_keyphrases(&embedder(), &PreTaggedText, "broken", &config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_tagged_text() {
        let err = extract_keyphrases(
            &embedder(),
            &PreTaggedText,
            "graph|NN theory",
            &ExtractionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::TaggedText { .. }));
    }

    #[test]
    fn test_extractor_batch_matches_single() {
        let extractor = KeyphraseExtractor::new(
            Arc::new(embedder()),
            Arc::new(PreTaggedText),
            ExtractionConfig {
                top_n: 2,
                ..ExtractionConfig::default()
            },
        )
        .unwrap();

        let docs = [DOC, "Music|NN theory|NN", "bad"];
        let batch = extractor.extract_batch(&docs);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].as_ref().unwrap(), &extractor.extract(DOC).unwrap());
        assert_eq!(
            batch[1].as_ref().unwrap(),
            &extractor.extract("Music|NN theory|NN").unwrap()
        );
        assert!(batch[2].is_err());
    }

    #[test]
    fn test_extract_tagged() {
        let extractor = KeyphraseExtractor::new(
            Arc::new(embedder()),
            Arc::new(PreTaggedText),
            ExtractionConfig::default(),
        )
        .unwrap();
        let sentences = parse_tagged_text(DOC).unwrap();
        assert_eq!(
            extractor.extract_tagged(&sentences).unwrap(),
            extractor.extract(DOC).unwrap()
        );
    }

    #[test]
    fn test_stemmed_representation() {
        let config = ExtractionConfig {
            text: TextConfig {
                stem: true,
                ..TextConfig::default()
            },
            ..ExtractionConfig::default()
        };
        // "graphs" stems to "graph", so the two spellings merge into one candidate
        let result = extract_keyphrases(
            &embedder(),
            &PreTaggedText,
            "Graphs|NNS[ENDSENT]graph|NN",
            &config,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].phrase, "graph");
    }
}
