//! Script analysis: LLM-backed per-script breakdown plus cross-script synthesis.
//!
//! The model's reply is parsed into loose wire types, then validated ONCE into the
//! typed `ScriptAnalysis`. Each finding carries a category-tagged detail, so
//! consumers match on the variant instead of re-interpreting free-form JSON.
//! Any failure (transport, parse, validation) yields `canned_analysis()`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::template::render;
use crate::llm_client::{complete_json, CompletionBackend};
use crate::tactics::catalog::TacticCategory;
use crate::tactics::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};

/// Characters of each script sent to the model.
const MAX_SCRIPT_CHARS: usize = 12_000;

// ────────────────────────────────────────────────────────────────────────────
// Typed analysis
// ────────────────────────────────────────────────────────────────────────────

/// Category-specific detail of a finding. Serialized with a `category` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum FindingDetail {
    Hook { hook_style: String },
    Narrative { arc_stage: String },
    Persuasion { principle: String },
    Engagement { prompt_kind: String },
    Emotional { emotion: String },
    Retention { device: String },
    Authority { source: String },
    Social { proof_kind: String },
    Scarcity { constraint: String },
}

impl FindingDetail {
    pub fn new(category: TacticCategory, note: String) -> Self {
        match category {
            TacticCategory::Hook => FindingDetail::Hook { hook_style: note },
            TacticCategory::Narrative => FindingDetail::Narrative { arc_stage: note },
            TacticCategory::Persuasion => FindingDetail::Persuasion { principle: note },
            TacticCategory::Engagement => FindingDetail::Engagement { prompt_kind: note },
            TacticCategory::Emotional => FindingDetail::Emotional { emotion: note },
            TacticCategory::Retention => FindingDetail::Retention { device: note },
            TacticCategory::Authority => FindingDetail::Authority { source: note },
            TacticCategory::Social => FindingDetail::Social { proof_kind: note },
            TacticCategory::Scarcity => FindingDetail::Scarcity { constraint: note },
        }
    }

    pub fn category(&self) -> TacticCategory {
        match self {
            FindingDetail::Hook { .. } => TacticCategory::Hook,
            FindingDetail::Narrative { .. } => TacticCategory::Narrative,
            FindingDetail::Persuasion { .. } => TacticCategory::Persuasion,
            FindingDetail::Engagement { .. } => TacticCategory::Engagement,
            FindingDetail::Emotional { .. } => TacticCategory::Emotional,
            FindingDetail::Retention { .. } => TacticCategory::Retention,
            FindingDetail::Authority { .. } => TacticCategory::Authority,
            FindingDetail::Social { .. } => TacticCategory::Social,
            FindingDetail::Scarcity { .. } => TacticCategory::Scarcity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticFinding {
    pub name: String,
    pub evidence: String,
    /// 0 – 100
    pub effectiveness: u8,
    #[serde(flatten)]
    pub detail: FindingDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOutline {
    pub title: String,
    pub purpose: String,
    /// 0 – 100
    pub share_percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptBreakdown {
    pub script_index: usize,
    pub tactics: Vec<TacticFinding>,
    pub structure: Vec<SectionOutline>,
    pub summary: String,
}

/// Cross-script result. Tactic names are unique, ordered by descending effectiveness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSynthesis {
    pub tactics: Vec<TacticFinding>,
    pub structure: Vec<SectionOutline>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptAnalysis {
    pub per_script: Vec<ScriptBreakdown>,
    pub synthesis: AnalysisSynthesis,
    pub source: AnalysisSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (as returned by the model)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    per_script: Vec<RawBreakdown>,
    synthesis: RawSynthesis,
}

#[derive(Debug, Deserialize)]
struct RawBreakdown {
    #[serde(default)]
    tactics: Vec<RawFinding>,
    #[serde(default)]
    structure: Vec<RawSection>,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawSynthesis {
    tactics: Vec<RawFinding>,
    #[serde(default)]
    structure: Vec<RawSection>,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawFinding {
    name: String,
    category: String,
    #[serde(default)]
    evidence: String,
    effectiveness: f64,
    #[serde(default)]
    detail: String,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    title: String,
    #[serde(default)]
    purpose: String,
    #[serde(default)]
    share_percent: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("expected {expected} script breakdowns, got {got}")]
    ScriptCountMismatch { expected: usize, got: usize },

    #[error("unknown tactic category '{0}'")]
    UnknownCategory(String),

    #[error("tactic with blank name")]
    BlankTacticName,

    #[error("effectiveness {value} for '{name}' is outside 0-100")]
    EffectivenessOutOfRange { name: String, value: f64 },

    #[error("section with blank title")]
    BlankSectionTitle,

    #[error("share_percent {0} is outside 0-100")]
    ShareOutOfRange(f64),
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn parse_category(raw: &str) -> Result<TacticCategory, AnalysisError> {
    let normalized = raw.trim().to_lowercase();
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| AnalysisError::UnknownCategory(raw.to_string()))
}

fn validate_percent(value: f64) -> Option<u8> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Some(value.round() as u8)
    } else {
        None
    }
}

fn validate_finding(raw: RawFinding) -> Result<TacticFinding, AnalysisError> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(AnalysisError::BlankTacticName);
    }
    let category = parse_category(&raw.category)?;
    let effectiveness =
        validate_percent(raw.effectiveness).ok_or(AnalysisError::EffectivenessOutOfRange {
            name: name.clone(),
            value: raw.effectiveness,
        })?;

    Ok(TacticFinding {
        name,
        evidence: raw.evidence.trim().to_string(),
        effectiveness,
        detail: FindingDetail::new(category, raw.detail.trim().to_string()),
    })
}

fn validate_section(raw: RawSection) -> Result<SectionOutline, AnalysisError> {
    let title = raw.title.trim().to_string();
    if title.is_empty() {
        return Err(AnalysisError::BlankSectionTitle);
    }
    let share_percent =
        validate_percent(raw.share_percent).ok_or(AnalysisError::ShareOutOfRange(raw.share_percent))?;
    Ok(SectionOutline {
        title,
        purpose: raw.purpose.trim().to_string(),
        share_percent,
    })
}

fn validate_all<R, T>(
    raw: Vec<R>,
    f: impl Fn(R) -> Result<T, AnalysisError>,
) -> Result<Vec<T>, AnalysisError> {
    raw.into_iter().map(f).collect()
}

/// Keeps the first finding per name, then stable-sorts by descending effectiveness.
fn dedupe_ranked(findings: Vec<TacticFinding>) -> Vec<TacticFinding> {
    let mut seen = HashSet::new();
    let mut unique: Vec<TacticFinding> = findings
        .into_iter()
        .filter(|f| seen.insert(f.name.clone()))
        .collect();
    unique.sort_by(|a, b| b.effectiveness.cmp(&a.effectiveness));
    unique
}

fn validate(raw: RawAnalysis, expected_scripts: usize) -> Result<ScriptAnalysis, AnalysisError> {
    if raw.per_script.len() != expected_scripts {
        return Err(AnalysisError::ScriptCountMismatch {
            expected: expected_scripts,
            got: raw.per_script.len(),
        });
    }

    let per_script = raw
        .per_script
        .into_iter()
        .enumerate()
        .map(|(script_index, b)| {
            Ok(ScriptBreakdown {
                script_index,
                tactics: validate_all(b.tactics, validate_finding)?,
                structure: validate_all(b.structure, validate_section)?,
                summary: b.summary.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    let synthesis = AnalysisSynthesis {
        tactics: dedupe_ranked(validate_all(raw.synthesis.tactics, validate_finding)?),
        structure: validate_all(raw.synthesis.structure, validate_section)?,
        summary: raw.synthesis.summary.trim().to_string(),
    };

    Ok(ScriptAnalysis {
        per_script,
        synthesis,
        source: AnalysisSource::Llm,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback
// ────────────────────────────────────────────────────────────────────────────

fn section(title: &str, purpose: &str, share_percent: u8) -> SectionOutline {
    SectionOutline {
        title: title.to_string(),
        purpose: purpose.to_string(),
        share_percent,
    }
}

/// Fixed analysis used whenever the model's answer is unusable.
/// Two tactics, four sections, independent of the input.
pub fn canned_analysis() -> ScriptAnalysis {
    ScriptAnalysis {
        per_script: Vec::new(),
        synthesis: AnalysisSynthesis {
            tactics: vec![
                TacticFinding {
                    name: "Curiosity Gap".to_string(),
                    evidence: String::new(),
                    effectiveness: 90,
                    detail: FindingDetail::Hook {
                        hook_style: "question hook".to_string(),
                    },
                },
                TacticFinding {
                    name: "Open Loop".to_string(),
                    evidence: String::new(),
                    effectiveness: 88,
                    detail: FindingDetail::Retention {
                        device: "promised payoff".to_string(),
                    },
                },
            ],
            structure: vec![
                section("Hook", "Stop the scroll and pose the central question", 10),
                section("Setup", "Establish stakes and context", 20),
                section("Body", "Deliver the main points with evidence", 55),
                section("Call to Action", "Tell the viewer exactly what to do next", 15),
            ],
            summary: "Open with a question the viewer needs answered, keep a payoff pending \
                through the body, and close with one clear action."
                .to_string(),
        },
        source: AnalysisSource::Fallback,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

pub fn build_analysis_prompt(scripts: &[String]) -> String {
    let categories = [
        "hook",
        "narrative",
        "persuasion",
        "engagement",
        "emotional",
        "retention",
        "authority",
        "social",
        "scarcity",
    ]
    .join(", ");

    let scripts_block = scripts
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let excerpt: String = s.chars().take(MAX_SCRIPT_CHARS).collect();
            format!("--- SCRIPT {i} ---\n{excerpt}")
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let script_count = scripts.len().to_string();
    render(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("script_count", &script_count),
            ("categories", &categories),
            ("scripts", &scripts_block),
        ],
    )
}

/// Runs the LLM analysis. Never fails: any error is logged and replaced by
/// `canned_analysis()`.
pub async fn analyze_scripts(llm: &dyn CompletionBackend, scripts: &[String]) -> ScriptAnalysis {
    let prompt = build_analysis_prompt(scripts);

    let raw: RawAnalysis = match complete_json(llm, &prompt, ANALYSIS_SYSTEM).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Analysis LLM call failed, using canned analysis: {e}");
            return canned_analysis();
        }
    };

    match validate(raw, scripts.len()) {
        Ok(analysis) => {
            let categories: HashSet<TacticCategory> = analysis
                .synthesis
                .tactics
                .iter()
                .map(|t| t.detail.category())
                .collect();
            info!(
                "Analyzed {} scripts: {} synthesized tactics across {} categories",
                scripts.len(),
                analysis.synthesis.tactics.len(),
                categories.len()
            );
            analysis
        }
        Err(e) => {
            warn!("Analysis response failed validation, using canned analysis: {e}");
            canned_analysis()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubBackend;
    use serde_json::json;

    fn parse_analysis(text: &str, expected_scripts: usize) -> Result<ScriptAnalysis, String> {
        let raw: RawAnalysis = serde_json::from_str(text).map_err(|e| e.to_string())?;
        validate(raw, expected_scripts).map_err(|e| e.to_string())
    }

    fn valid_reply(script_count: usize) -> String {
        let breakdown = json!({
            "script_index": 0,
            "tactics": [
                {"name": "Curiosity Gap", "category": "hook", "evidence": "Nobody tells you",
                 "effectiveness": 88, "detail": "question hook"},
                {"name": "Social Proof", "category": "Social", "evidence": "Thousands joined",
                 "effectiveness": 70.4, "detail": "crowd size"}
            ],
            "structure": [
                {"title": "Hook", "purpose": "Stop the scroll", "share_percent": 10},
                {"title": "Body", "purpose": "Explain", "share_percent": 90}
            ],
            "summary": "Works because of the hook."
        });
        json!({
            "per_script": vec![breakdown; script_count],
            "synthesis": {
                "tactics": [
                    {"name": "Social Proof", "category": "social", "effectiveness": 70},
                    {"name": "Curiosity Gap", "category": "hook", "effectiveness": 88},
                    {"name": "Social Proof", "category": "social", "effectiveness": 99},
                    {"name": "Open Loop", "category": "retention", "effectiveness": 70}
                ],
                "structure": [{"title": "Hook", "share_percent": 12}],
                "summary": "Shared formula."
            }
        })
        .to_string()
    }

    #[test]
    fn test_parses_and_tags_findings_by_category() {
        let analysis = parse_analysis(&valid_reply(2), 2).unwrap();
        assert_eq!(analysis.source, AnalysisSource::Llm);
        assert_eq!(analysis.per_script.len(), 2);
        assert_eq!(analysis.per_script[1].script_index, 1);

        let first = &analysis.per_script[0].tactics[0];
        assert_eq!(
            first.detail,
            FindingDetail::Hook {
                hook_style: "question hook".to_string()
            }
        );
        let second = &analysis.per_script[0].tactics[1];
        assert_eq!(second.detail.category(), TacticCategory::Social);
        assert_eq!(second.effectiveness, 70);
    }

    #[test]
    fn test_synthesis_is_deduped_and_ranked() {
        let analysis = parse_analysis(&valid_reply(1), 1).unwrap();
        let names: Vec<_> = analysis
            .synthesis
            .tactics
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        // First "Social Proof" (70) wins over the later 99; ties keep order.
        assert_eq!(names, vec!["Curiosity Gap", "Social Proof", "Open Loop"]);
        assert_eq!(analysis.synthesis.tactics[1].effectiveness, 70);
    }

    #[test]
    fn test_rejects_script_count_mismatch() {
        let err = parse_analysis(&valid_reply(1), 3).unwrap_err();
        assert!(err.contains("expected 3"));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let reply = json!({
            "per_script": [],
            "synthesis": {"tactics": [{"name": "X", "category": "telepathy", "effectiveness": 50}]}
        })
        .to_string();
        let err = parse_analysis(&reply, 0).unwrap_err();
        assert!(err.contains("telepathy"));
    }

    #[test]
    fn test_rejects_out_of_range_effectiveness() {
        let reply = json!({
            "per_script": [],
            "synthesis": {"tactics": [{"name": "X", "category": "hook", "effectiveness": 140}]}
        })
        .to_string();
        assert!(parse_analysis(&reply, 0).is_err());
    }

    #[test]
    fn test_finding_serializes_with_category_tag() {
        let finding = TacticFinding {
            name: "Limited Time".to_string(),
            evidence: "ends Friday".to_string(),
            effectiveness: 77,
            detail: FindingDetail::Scarcity {
                constraint: "deadline".to_string(),
            },
        };
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["category"], "scarcity");
        assert_eq!(value["constraint"], "deadline");

        let back: TacticFinding = serde_json::from_value(value).unwrap();
        assert_eq!(back, finding);
    }

    #[test]
    fn test_canned_analysis_shape() {
        let canned = canned_analysis();
        assert_eq!(canned.source, AnalysisSource::Fallback);
        assert_eq!(canned.synthesis.tactics.len(), 2);
        assert_eq!(canned.synthesis.structure.len(), 4);
        let total: u32 = canned
            .synthesis
            .structure
            .iter()
            .map(|s| s.share_percent as u32)
            .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_prompt_lists_every_script() {
        let prompt = build_analysis_prompt(&["first one".to_string(), "second one".to_string()]);
        assert!(prompt.contains("--- SCRIPT 0 ---\nfirst one"));
        assert!(prompt.contains("--- SCRIPT 1 ---\nsecond one"));
        assert!(prompt.contains("exactly 2 entries"));
    }

    #[tokio::test]
    async fn test_analyze_uses_llm_reply_when_valid() {
        let llm = StubBackend::replying(valid_reply(1));
        let analysis = analyze_scripts(&llm, &["a script".to_string()]).await;
        assert_eq!(analysis.source, AnalysisSource::Llm);
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_llm_failure() {
        let llm = StubBackend::failing();
        let analysis = analyze_scripts(&llm, &["a script".to_string()]).await;
        assert_eq!(analysis, canned_analysis());
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_malformed_json() {
        let llm = StubBackend::replying("{\"per_script\": [");
        let analysis = analyze_scripts(&llm, &["a script".to_string()]).await;
        assert_eq!(analysis, canned_analysis());
    }

    #[tokio::test]
    async fn test_fallback_is_independent_of_input() {
        let llm = StubBackend::failing();
        let one = analyze_scripts(&llm, &["a".to_string()]).await;
        let three = analyze_scripts(&llm, &["a".into(), "b".into(), "c".into()]).await;
        assert_eq!(one, three);
    }
}
