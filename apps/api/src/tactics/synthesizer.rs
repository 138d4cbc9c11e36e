//! Synthesis: merges tactic findings from several reference scripts.

use std::collections::HashSet;

use crate::tactics::catalog::Tactic;

/// Flattens per-script results, keeps the first occurrence of each name, and
/// orders the survivors by descending effectiveness.
///
/// `sort_by` is stable, so equal weights keep their insertion order.
pub fn synthesize(per_script: &[Vec<Tactic>]) -> Vec<Tactic> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged: Vec<Tactic> = Vec::new();

    for tactic in per_script.iter().flatten() {
        if seen.insert(tactic.name.as_str()) {
            merged.push(tactic.clone());
        }
    }

    merged.sort_by(|a, b| b.effectiveness_weight.cmp(&a.effectiveness_weight));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::catalog::TacticCategory;

    fn tactic(name: &str, weight: u8, description: &str) -> Tactic {
        Tactic {
            name: name.to_string(),
            category: TacticCategory::Persuasion,
            description: description.to_string(),
            effectiveness_weight: weight,
            example_phrases: vec![],
        }
    }

    fn names(tactics: &[Tactic]) -> Vec<&str> {
        tactics.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(synthesize(&[]).is_empty());
        assert!(synthesize(&[vec![], vec![]]).is_empty());
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let input = vec![vec![
            tactic("A", 80, ""),
            tactic("B", 90, ""),
            tactic("C", 80, ""),
        ]];
        assert_eq!(names(&synthesize(&input)), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_overlapping_names_appear_once() {
        let input = vec![
            vec![tactic("Open Loop", 88, ""), tactic("Social Proof", 83, "")],
            vec![tactic("Social Proof", 83, ""), tactic("Open Loop", 88, "")],
            vec![tactic("Open Loop", 88, "")],
        ];
        let out = synthesize(&input);
        assert_eq!(names(&out), vec!["Open Loop", "Social Proof"]);
    }

    #[test]
    fn test_first_occurrence_wins_for_descriptive_fields() {
        let input = vec![
            vec![tactic("Open Loop", 88, "first")],
            vec![tactic("Open Loop", 40, "second")],
        ];
        let out = synthesize(&input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description, "first");
        assert_eq!(out[0].effectiveness_weight, 88);
    }

    #[test]
    fn test_ties_across_scripts_keep_flatten_order() {
        let input = vec![
            vec![tactic("X", 70, "")],
            vec![tactic("Y", 95, ""), tactic("Z", 70, "")],
        ];
        assert_eq!(names(&synthesize(&input)), vec!["Y", "X", "Z"]);
    }
}
