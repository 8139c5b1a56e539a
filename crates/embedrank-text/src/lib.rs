//! EmbedRank Text: tagged text, normalization, candidate extraction.

pub mod candidates;
pub mod representation;
pub mod stemmer;
pub mod tagged;

pub use candidates::{extract_candidates, extract_sentence_candidates, unique_ngram_candidates};
pub use representation::TextRepresentation;
pub use tagged::{
    format_tagged_text, parse_tagged_text, PosTagger, PreTaggedText, TaggedSentence, TaggedToken,
};
