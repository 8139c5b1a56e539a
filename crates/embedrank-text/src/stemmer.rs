//! English Snowball stemmer used when a representation is built with `stem = true`.

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Stem a lower-cased word.
pub fn stem(word: &str) -> String {
    STEMMER.stem(&word.to_lowercase()).into_owned()
}
