//! Post-generation metrics. Reported to the caller only; nothing branches on them.

use std::collections::HashSet;

use serde::Serialize;

use crate::generation::fallback::word_count;

/// Average narration pace used for duration estimates.
pub const WORDS_PER_MINUTE: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationMetrics {
    pub word_count: usize,
    pub target_word_count: usize,
    pub estimated_duration_seconds: u32,
    /// 0 – 100. 100 means no word trigram is shared with any reference script.
    pub uniqueness_score: u8,
    /// 0 – 100. Share of topic words (longer than 3 chars) that appear in the script.
    pub topic_relevance: u8,
    pub approach: String,
    pub seed: u64,
}

/// Lower-cased words with surrounding punctuation stripped.
fn normalized_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn trigrams(words: &[String]) -> HashSet<(String, String, String)> {
    words
        .windows(3)
        .map(|w| (w[0].clone(), w[1].clone(), w[2].clone()))
        .collect()
}

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 100;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u8
}

pub fn estimated_duration_seconds(words: usize) -> u32 {
    (words as f64 / WORDS_PER_MINUTE * 60.0).round() as u32
}

pub fn uniqueness_score(script: &str, references: &[String]) -> u8 {
    let script_trigrams = trigrams(&normalized_words(script));
    if script_trigrams.is_empty() {
        return 100;
    }

    let reference_trigrams: HashSet<_> = references
        .iter()
        .flat_map(|r| trigrams(&normalized_words(r)))
        .collect();

    let fresh = script_trigrams
        .iter()
        .filter(|t| !reference_trigrams.contains(*t))
        .count();
    percent(fresh, script_trigrams.len())
}

pub fn topic_relevance(script: &str, topic: &str) -> u8 {
    let topic_words: HashSet<String> = normalized_words(topic)
        .into_iter()
        .filter(|w| w.chars().count() > 3)
        .collect();
    if topic_words.is_empty() {
        return 100;
    }

    let script_words: HashSet<String> = normalized_words(script).into_iter().collect();
    let present = topic_words
        .iter()
        .filter(|w| script_words.contains(*w))
        .count();
    percent(present, topic_words.len())
}

pub fn compute_metrics(
    script: &str,
    topic: &str,
    references: &[String],
    target_word_count: usize,
    approach: &str,
    seed: u64,
) -> GenerationMetrics {
    let words = word_count(script);
    GenerationMetrics {
        word_count: words,
        target_word_count,
        estimated_duration_seconds: estimated_duration_seconds(words),
        uniqueness_score: uniqueness_score(script, references),
        topic_relevance: topic_relevance(script, topic),
        approach: approach.to_string(),
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_uses_150_words_per_minute() {
        assert_eq!(estimated_duration_seconds(150), 60);
        assert_eq!(estimated_duration_seconds(1500), 600);
        assert_eq!(estimated_duration_seconds(0), 0);
    }

    #[test]
    fn test_uniqueness_full_copy_scores_zero() {
        let reference = "the quick brown fox jumps over the lazy dog".to_string();
        assert_eq!(uniqueness_score(&reference, &[reference.clone()]), 0);
    }

    #[test]
    fn test_uniqueness_without_references_is_perfect() {
        assert_eq!(uniqueness_score("one two three four", &[]), 100);
        assert_eq!(uniqueness_score("too short", &["too short".to_string()]), 100);
    }

    #[test]
    fn test_uniqueness_ignores_case_and_punctuation() {
        let reference = vec!["Alpha beta gamma delta".to_string()];
        // trigrams: (alpha beta gamma) shared, (beta gamma omega) fresh
        assert_eq!(uniqueness_score("ALPHA, beta gamma... omega!", &reference), 50);
    }

    #[test]
    fn test_topic_relevance_counts_long_words_only() {
        // "the" and "of" are ignored; "history" present, "rome" present
        assert_eq!(topic_relevance("A history lesson about Rome.", "the history of rome"), 100);
        assert_eq!(topic_relevance("A history lesson.", "the history of rome"), 50);
    }

    #[test]
    fn test_topic_relevance_with_only_short_words() {
        assert_eq!(topic_relevance("anything", "AI vs ML"), 100);
    }

    #[test]
    fn test_compute_metrics_fills_every_field() {
        let metrics = compute_metrics(
            "Saving money starts with a budget.",
            "saving money",
            &[],
            1400,
            "coach",
            9,
        );
        assert_eq!(metrics.word_count, 6);
        assert_eq!(metrics.target_word_count, 1400);
        assert_eq!(metrics.topic_relevance, 100);
        assert_eq!(metrics.uniqueness_score, 100);
        assert_eq!(metrics.approach, "coach");
        assert_eq!(metrics.seed, 9);
    }
}
