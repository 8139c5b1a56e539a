//! EmbedRank Rank: keyphrase ranking.
//!
//! Candidates and the document are embedded into one space; Maximal Marginal
//! Relevance picks phrases that are relevant to the document but not to each
//! other, and leftover near-duplicates are attached to the phrase they echo.

pub mod alias;
pub mod extractor;
pub mod lookup;
pub mod mmr;
pub mod similarity;

pub use alias::group_aliases;
pub use extractor::{extract_keyphrases, rank_representation, Keyphrase, KeyphraseExtractor};
pub use lookup::{
    extract_candidates_embedding_for_doc, extract_doc_embedding,
    extract_sent_candidates_embedding_for_doc, CandidateEmbeddings,
};
pub use mmr::{select, select_candidates, Selection};
pub use similarity::{cosine_similarity, cosine_to_rows};
