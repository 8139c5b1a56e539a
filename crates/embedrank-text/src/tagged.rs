//! POS-tagged text: token model, tagger trait, and the `word|TAG` interchange format.
//!
//! Tagged documents are exchanged as whitespace-separated `word|TAG` tokens
//! with sentences joined by `[ENDSENT]`:
//!
//! ```text
//! Write|VB your|PRP$ python|NN code|NN .|.[ENDSENT]Thank|VB you|PRP .|.
//! ```

use embedrank_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Separator between a word and its tag.
pub const TAG_SEPARATOR: char = '|';

/// Separator between sentences.
pub const SENTENCE_SEPARATOR: &str = "[ENDSENT]";

/// A token and its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

pub type TaggedSentence = Vec<TaggedToken>;

/// Source of POS-tagged sentences for raw text.
///
/// Implementations are long-lived and shared across extractions, so they must
/// be safe for concurrent read-only use.
pub trait PosTagger: Send + Sync {
    /// Split `raw_text` into sentences of tagged tokens.
    fn pos_tag(&self, raw_text: &str) -> Result<Vec<TaggedSentence>>;
}

/// Tagger for text that was already tagged upstream in `word|TAG` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreTaggedText;

impl PosTagger for PreTaggedText {
    fn pos_tag(&self, raw_text: &str) -> Result<Vec<TaggedSentence>> {
        parse_tagged_text(raw_text)
    }
}

/// Split one `word|TAG` token on its last separator.
pub fn parse_tagged_token(token: &str) -> Result<TaggedToken> {
    let malformed = |reason: &str| Error::TaggedText {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    let loc = token
        .rfind(TAG_SEPARATOR)
        .ok_or_else(|| malformed("missing tag separator"))?;
    let (word, tag) = (&token[..loc], &token[loc + TAG_SEPARATOR.len_utf8()..]);

    if word.is_empty() {
        return Err(malformed("empty word"));
    }
    if tag.is_empty() {
        return Err(malformed("empty tag"));
    }
    Ok(TaggedToken::new(word, tag))
}

/// Parse a tagged document into sentences.
///
/// Runs of whitespace (including newlines) separate tokens. Sentences with no
/// tokens, such as the one after a trailing `[ENDSENT]`, are skipped.
pub fn parse_tagged_text(text: &str) -> Result<Vec<TaggedSentence>> {
    let mut sentences = Vec::new();
    for raw in text.split(SENTENCE_SEPARATOR) {
        let sentence = raw
            .split_whitespace()
            .map(parse_tagged_token)
            .collect::<Result<TaggedSentence>>()?;
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
    }
    Ok(sentences)
}

/// Write sentences back into the `word|TAG` format.
pub fn format_tagged_text(sentences: &[TaggedSentence]) -> String {
    sentences
        .iter()
        .map(|sent| {
            sent.iter()
                .map(|t| format!("{}{}{}", t.word, TAG_SEPARATOR, t.tag))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(SENTENCE_SEPARATOR)
}
