//! Tactic matching: keyword scan of a script against the catalog.
//!
//! Algorithm:
//! 1. Lower-case the script once.
//! 2. For every example phrase of a tactic, take its first three whitespace tokens.
//! 3. If any of those tokens (lower-cased) occurs as a substring of the script,
//!    the tactic is present.
//!
//! Output keeps catalog order. There is no match strength, negation, or stemming.

use crate::tactics::catalog::{Tactic, TacticDef, CATALOG};

/// Number of leading tokens taken from each example phrase.
const KEYWORDS_PER_PHRASE: usize = 3;

/// Returns every catalog tactic detected in `script`, in catalog order.
pub fn match_tactics(script: &str) -> Vec<Tactic> {
    match_against(CATALOG, script)
}

/// Same as [`match_tactics`] against an arbitrary table.
pub fn match_against(catalog: &[TacticDef], script: &str) -> Vec<Tactic> {
    let haystack = script.to_lowercase();
    if haystack.trim().is_empty() {
        return Vec::new();
    }

    catalog
        .iter()
        .filter(|def| is_present(def, &haystack))
        .map(TacticDef::to_tactic)
        .collect()
}

fn is_present(def: &TacticDef, haystack: &str) -> bool {
    def.example_phrases.iter().any(|phrase| {
        phrase_keywords(phrase)
            .iter()
            .any(|keyword| haystack.contains(keyword.as_str()))
    })
}

/// First three whitespace-delimited tokens of a phrase, lower-cased.
pub fn phrase_keywords(phrase: &str) -> Vec<String> {
    phrase
        .split_whitespace()
        .take(KEYWORDS_PER_PHRASE)
        .map(str::to_lowercase)
        .collect()
}
