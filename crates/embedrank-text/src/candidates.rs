//! Candidate extraction: noun-phrase chunks or whole sentences.
//!
//! Phrase grammar: `(modifier | noun)* noun`, matched greedily left to right
//! within a sentence. A run of modifier/noun tokens yields one chunk that ends
//! at the run's last noun.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use embedrank_core::{ChunkerConfig, Error, Result};
use regex::Regex;
use tracing::debug;

use crate::representation::TextRepresentation;
use crate::tagged::TaggedToken;

/// Noun-phrase candidates of a document.
///
/// Candidates are distinct and in order of first occurrence, unless
/// `config.no_subset` is set, in which case the order is the one produced by
/// [`unique_ngram_candidates`].
pub fn extract_candidates(
    repr: &TextRepresentation,
    config: &ChunkerConfig,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for sentence in repr.sentences() {
        for chunk in chunk_sentence(sentence, config) {
            if chunk.len() > config.max_tokens {
                continue;
            }
            let phrase = chunk
                .iter()
                .map(|t| t.word.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if seen.insert(phrase.clone()) {
                candidates.push(phrase);
            }
        }
    }

    debug!("Extracted {} distinct candidate phrases", candidates.len());

    if config.no_subset {
        unique_ngram_candidates(&candidates)
    } else {
        Ok(candidates)
    }
}

/// Each non-empty sentence as one space-joined candidate.
pub fn extract_sentence_candidates(repr: &TextRepresentation) -> Vec<String> {
    repr.sentences()
        .filter(|s| !s.is_empty())
        .map(|s| s.iter().map(|t| t.word.as_str()).collect::<Vec<_>>().join(" "))
        .collect()
}

/// Maximal `(modifier | noun)* noun` spans of one sentence.
fn chunk_sentence<'a>(tokens: &'a [TaggedToken], config: &ChunkerConfig) -> Vec<&'a [TaggedToken]> {
    let mut chunks = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let in_phrase = |t: &TaggedToken| config.is_noun(&t.tag) || config.is_modifier(&t.tag);
        if !in_phrase(&tokens[i]) {
            i += 1;
            continue;
        }

        let run_end = tokens[i..]
            .iter()
            .position(|t| !in_phrase(t))
            .map_or(tokens.len(), |p| i + p);

        match tokens[i..run_end].iter().rposition(|t| config.is_noun(&t.tag)) {
            Some(last_noun) => {
                let end = i + last_noun + 1;
                chunks.push(&tokens[i..end]);
                i = end;
            }
            None => i = run_end,
        }
    }

    chunks
}

/// Drop every string that occurs as a whole word sequence inside a longer one.
///
/// Strings are visited longest first (by character count), ties broken
/// alphabetically, so the output order is deterministic.
///
/// `["machine learning", "machine", "backward induction", "induction", "start"]`
/// becomes `["backward induction", "machine learning", "start"]`.
pub fn unique_ngram_candidates<S: AsRef<str>>(strings: &[S]) -> Result<Vec<String>> {
    let mut distinct: Vec<&str> = strings
        .iter()
        .map(AsRef::as_ref)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    // Stable sort keeps the alphabetical order among equal lengths
    distinct.sort_by_key(|s| Reverse(s.chars().count()));

    let mut results: Vec<String> = Vec::with_capacity(distinct.len());
    for s in distinct {
        let pattern = whole_word_pattern(s)?;
        let contained = results
            .iter()
            .any(|r| r.contains(s) && pattern.is_match(r));
        if !contained {
            results.push(s.to_string());
        }
    }
    Ok(results)
}

fn whole_word_pattern(needle: &str) -> Result<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(needle)))
        .map_err(|e| Error::InvalidInput(format!("candidate {:?}: {}", needle, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagged::parse_tagged_text;
    use embedrank_core::TextConfig;

    fn repr(text: &str) -> TextRepresentation {
        TextRepresentation::new(&parse_tagged_text(text).unwrap(), &TextConfig::default())
    }

    #[test]
    fn test_unique_ngram_candidates() {
        let result = unique_ngram_candidates(&[
            "machine learning",
            "machine",
            "backward induction",
            "induction",
            "start",
        ])
        .unwrap();
        assert_eq!(result, vec!["backward induction", "machine learning", "start"]);
    }

    #[test]
    fn test_unique_ngram_whole_words_only() {
        // "learn" is a substring of "machine learning" but not a whole word of it
        let result = unique_ngram_candidates(&["machine learning", "learn", "learn"]).unwrap();
        assert_eq!(result, vec!["machine learning", "learn"]);
    }

    #[test]
    fn test_unique_ngram_many_candidates() {
        let mut strings: Vec<String> = (0..3000)
            .map(|i| format!("word{} term{}", i, i % 97))
            .collect();
        strings.extend((0..97).map(|k| format!("term{}", k)));
        strings.extend((0..50).map(|i| format!("word{}", i)));
        strings.push("standalone".to_string());

        let result = unique_ngram_candidates(&strings).unwrap();
        assert_eq!(result.len(), 3001);
        assert!(result.iter().any(|r| r == "standalone"));
        assert!(!result.iter().any(|r| r == "term5" || r == "word1"));
        assert!(result.iter().any(|r| r == "word10 term10"));
    }

    #[test]
    fn test_basic_chunks() {
        let r = repr(
            "The|DT quick|JJ brown|JJ fox|NN jumps|VBZ over|IN the|DT lazy|JJ dog|NN",
        );
        let candidates = extract_candidates(&r, &ChunkerConfig::default()).unwrap();
        assert_eq!(candidates, vec!["quick brown fox", "lazy dog"]);
    }

    #[test]
    fn test_chunk_ends_at_last_noun() {
        // Trailing adjectives after the head noun are not part of the phrase
        let r = repr("neural|JJ network|NN models|NNS robust|JJ fast|JJ");
        let candidates = extract_candidates(&r, &ChunkerConfig::default()).unwrap();
        assert_eq!(candidates, vec!["neural network models"]);
    }

    #[test]
    fn test_adjectives_without_noun() {
        let r = repr("very|RB large|JJ green|JJ");
        assert!(extract_candidates(&r, &ChunkerConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_short_tokens_break_chunks() {
        // "of" is retagged as too short, "AI" too
        let r = repr("theory|NN of|IN games|NNS AI|NNP");
        let candidates = extract_candidates(&r, &ChunkerConfig::default()).unwrap();
        assert_eq!(candidates, vec!["theory", "games"]);
    }

    #[test]
    fn test_no_cross_sentence_chunks() {
        let r = repr("machine|NN[ENDSENT]learning|NN");
        let candidates = extract_candidates(&r, &ChunkerConfig::default()).unwrap();
        assert_eq!(candidates, vec!["machine", "learning"]);
    }

    #[test]
    fn test_max_tokens() {
        let r = repr(
            "large|JJ scale|NN distributed|JJ graph|NN processing|NN system|NN[ENDSENT]graph|NN processing|NN",
        );
        let candidates = extract_candidates(&r, &ChunkerConfig::default()).unwrap();
        assert_eq!(candidates, vec!["graph processing"]);
        assert!(candidates.iter().all(|c| c.split(' ').count() <= 5));
    }

    #[test]
    fn test_deduplicated_in_first_occurrence_order() {
        let r = repr("Graph|NN theory|NN[ENDSENT]Sets|NNS[ENDSENT]graph|NN theory|NN");
        let candidates = extract_candidates(&r, &ChunkerConfig::default()).unwrap();
        assert_eq!(candidates, vec!["graph theory", "sets"]);
    }

    #[test]
    fn test_no_subset() {
        let r = repr(
            "machine|NN learning|NN[ENDSENT]machine|NN works|VBZ[ENDSENT]start|NN",
        );
        let config = ChunkerConfig {
            no_subset: true,
            ..ChunkerConfig::default()
        };
        let candidates = extract_candidates(&r, &config).unwrap();
        assert_eq!(candidates, vec!["machine learning", "start"]);
    }

    #[test]
    fn test_sentence_candidates() {
        let r = repr("Cats|NNS sleep|VBP .|.[ENDSENT]Dogs|NNS bark|VBP");
        assert_eq!(
            extract_sentence_candidates(&r),
            vec!["cats sleep .", "dogs bark"]
        );
    }
}
