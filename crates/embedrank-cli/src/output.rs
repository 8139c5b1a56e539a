//! Rendering of extraction results.

use embedrank_rank::Keyphrase;
use serde_json::{json, Value};

/// One line per keyphrase: score, phrase, and aliases if any.
pub fn render_text(keyphrases: &[Keyphrase]) -> String {
    let mut out = String::new();
    for k in keyphrases {
        out.push_str(&format!("{:.4}\t{}", k.score, k.phrase));
        if !k.aliases.is_empty() {
            out.push_str(&format!("\t[{}]", k.aliases.join(", ")));
        }
        out.push('\n');
    }
    out
}

/// JSON entry for one document of a batch, successful or not.
pub fn batch_entry(document: usize, result: &embedrank_core::Result<Vec<Keyphrase>>) -> Value {
    match result {
        Ok(keyphrases) => json!({ "document": document, "keyphrases": keyphrases }),
        Err(e) => json!({ "document": document, "error": e.to_string() }),
    }
}
