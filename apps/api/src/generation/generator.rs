//! Script Generation: orchestrates the full generation pipeline.
//!
//! Flow: match tactics per reference script → synthesize → pick format →
//!       seeded variation → LLM generate → (fallback expander) → metrics.
//!
//! The pipeline never fails once the request is valid. Any LLM failure, or an
//! empty reply, switches to the deterministic expander.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::fallback::expand;
use crate::generation::metrics::{compute_metrics, GenerationMetrics};
use crate::generation::prompts::{GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM};
use crate::generation::template::render;
use crate::generation::variation::{fresh_seed, PromptVariation};
use crate::llm_client::prompts::{ORIGINALITY_INSTRUCTION, SPOKEN_WORD_INSTRUCTION};
use crate::llm_client::CompletionBackend;
use crate::tactics::catalog::Tactic;
use crate::tactics::formats::recommend;
use crate::tactics::handlers::MAX_REFERENCE_SCRIPTS;
use crate::tactics::matcher::match_tactics;
use crate::tactics::synthesizer::synthesize;

/// Used when neither a word target nor a video length is given.
pub const DEFAULT_TARGET_WORDS: usize = 1400;
const WORDS_PER_MINUTE: usize = 150;
const MAX_VIDEO_MINUTES: u32 = 60;
const MAX_TARGET_WORDS: usize = 10_000;
/// Characters of each reference script quoted in the prompt.
const REFERENCE_EXCERPT_CHARS: usize = 1500;
const DEFAULT_CALL_TO_ACTION: &str =
    "Subscribe and turn on notifications so you never miss the next video.";
const DEFAULT_FORMAT: &str = "Story-Driven Format";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for script generation. Only `topic` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub video_length_minutes: Option<u32>,
    #[serde(default)]
    pub reference_scripts: Vec<String>,
    pub call_to_action: Option<String>,
    pub format: Option<String>,
    pub target_word_count: Option<usize>,
    /// Overrides the configured or random prompt seed.
    pub seed: Option<u64>,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.topic.trim().is_empty() {
            return Err(AppError::Validation("topic cannot be empty".to_string()));
        }
        if self.reference_scripts.len() > MAX_REFERENCE_SCRIPTS {
            return Err(AppError::Validation(format!(
                "at most {MAX_REFERENCE_SCRIPTS} reference scripts may be submitted"
            )));
        }
        if let Some(i) = self.reference_scripts.iter().position(|s| s.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "reference_scripts[{i}] cannot be empty"
            )));
        }
        if let Some(minutes) = self.video_length_minutes {
            if minutes == 0 || minutes > MAX_VIDEO_MINUTES {
                return Err(AppError::Validation(format!(
                    "video_length_minutes must be between 1 and {MAX_VIDEO_MINUTES}"
                )));
            }
        }
        if let Some(words) = self.target_word_count {
            if words == 0 || words > MAX_TARGET_WORDS {
                return Err(AppError::Validation(format!(
                    "target_word_count must be between 1 and {MAX_TARGET_WORDS}"
                )));
            }
        }
        Ok(())
    }

    /// Explicit word target, else video length at narration pace, else the default.
    pub fn base_target_words(&self) -> usize {
        self.target_word_count
            .or(self
                .video_length_minutes
                .map(|m| m as usize * WORDS_PER_MINUTE))
            .unwrap_or(DEFAULT_TARGET_WORDS)
    }

    fn call_to_action(&self) -> &str {
        non_blank(self.call_to_action.as_deref()).unwrap_or(DEFAULT_CALL_TO_ACTION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptSource {
    Llm,
    Fallback,
}

/// Response from the generation pipeline. `success` is always true: a failed
/// LLM call is reported through `source`, not as an error.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub script: String,
    pub success: bool,
    pub source: ScriptSource,
    pub format: String,
    pub metrics: GenerationMetrics,
    pub tactics_used: Vec<Tactic>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full script generation pipeline. The request must already be validated.
///
/// Seed precedence: request seed, then `default_seed` (from config), then a fresh random one.
pub async fn generate_script(
    llm: &dyn CompletionBackend,
    request: &GenerateRequest,
    default_seed: Option<u64>,
) -> GenerateResponse {
    let per_script: Vec<Vec<Tactic>> = request
        .reference_scripts
        .iter()
        .map(|s| match_tactics(s))
        .collect();
    let tactics = synthesize(&per_script);
    info!(
        "Synthesized {} tactics from {} reference scripts",
        tactics.len(),
        request.reference_scripts.len()
    );

    let (format, format_structure) = choose_format(request);

    let seed = request.seed.or(default_seed).unwrap_or_else(fresh_seed);
    let variation = PromptVariation::from_seed(seed, request.base_target_words());
    info!(
        "Generating '{}' script: approach={}, target={} words, seed={}",
        format, variation.approach, variation.target_word_count, seed
    );

    let prompt = build_generation_prompt(request, &variation, &tactics, &format, &format_structure);

    let (script, source) = match llm.complete(&prompt, GENERATION_SYSTEM).await {
        Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), ScriptSource::Llm),
        Ok(_) => {
            warn!("Generation LLM returned an empty script, using fallback expander");
            (fallback_script(request, &variation), ScriptSource::Fallback)
        }
        Err(e) => {
            warn!("Generation LLM call failed, using fallback expander: {e}");
            (fallback_script(request, &variation), ScriptSource::Fallback)
        }
    };

    let metrics = compute_metrics(
        &script,
        &request.topic,
        &request.reference_scripts,
        variation.target_word_count,
        variation.approach,
        seed,
    );
    info!(
        "Generated script: {} words ({:?}), uniqueness={}, relevance={}",
        metrics.word_count, source, metrics.uniqueness_score, metrics.topic_relevance
    );

    GenerateResponse {
        script,
        success: true,
        source,
        format,
        metrics,
        tactics_used: tactics,
    }
}

fn fallback_script(request: &GenerateRequest, variation: &PromptVariation) -> String {
    expand(
        request.topic.trim(),
        request.call_to_action(),
        variation.target_word_count,
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Requested format if given, else the top recommendation for topic and description.
fn choose_format(request: &GenerateRequest) -> (String, String) {
    if let Some(format) = non_blank(request.format.as_deref()) {
        return (format.to_string(), "Use the conventions of this format.".to_string());
    }

    let description = request.description.as_deref().unwrap_or("");
    match recommend(&request.topic, description, "").into_iter().next() {
        Some(top) => (top.format, top.structure),
        None => (
            DEFAULT_FORMAT.to_string(),
            "Hook, setup, rising tension, payoff, call to action.".to_string(),
        ),
    }
}

/// Builds the generation prompt. Deterministic for a given request and variation.
pub fn build_generation_prompt(
    request: &GenerateRequest,
    variation: &PromptVariation,
    tactics: &[Tactic],
    format: &str,
    format_structure: &str,
) -> String {
    let tactics_block = if tactics.is_empty() {
        "(none detected; use a strong hook and an open loop)".to_string()
    } else {
        tactics
            .iter()
            .map(|t| {
                format!(
                    "- {} ({:?}, weight {}): {}",
                    t.name, t.category, t.effectiveness_weight, t.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let references_block = if request.reference_scripts.is_empty() {
        "(none provided)".to_string()
    } else {
        request
            .reference_scripts
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let excerpt: String = s.chars().take(REFERENCE_EXCERPT_CHARS).collect();
                format!("--- REFERENCE {} ---\n{}", i + 1, excerpt)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let target_word_count = variation.target_word_count.to_string();
    render(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("originality_instruction", ORIGINALITY_INSTRUCTION),
            ("spoken_word_instruction", SPOKEN_WORD_INSTRUCTION),
            ("topic", request.topic.trim()),
            (
                "description",
                non_blank(request.description.as_deref()).unwrap_or("(none)"),
            ),
            (
                "target_audience",
                non_blank(request.target_audience.as_deref())
                    .unwrap_or("general online audience"),
            ),
            ("format", format),
            ("format_structure", format_structure),
            ("approach", variation.instruction),
            ("target_word_count", &target_word_count),
            ("tactics", &tactics_block),
            ("references", &references_block),
            ("call_to_action", request.call_to_action()),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::fallback::word_count;
    use crate::llm_client::testing::StubBackend;

    fn request(topic: &str) -> GenerateRequest {
        GenerateRequest {
            topic: topic.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_rejects_blank_topic() {
        assert!(matches!(
            request("   ").validate(),
            Err(AppError::Validation(_))
        ));
        assert!(request("budgeting").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_lengths() {
        let mut req = request("budgeting");
        req.video_length_minutes = Some(0);
        assert!(req.validate().is_err());

        let mut req = request("budgeting");
        req.target_word_count = Some(MAX_TARGET_WORDS + 1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_reference_script() {
        let mut req = request("budgeting");
        req.reference_scripts = vec!["fine".to_string(), "".to_string()];
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_base_target_precedence() {
        let mut req = request("budgeting");
        assert_eq!(req.base_target_words(), DEFAULT_TARGET_WORDS);

        req.video_length_minutes = Some(4);
        assert_eq!(req.base_target_words(), 600);

        req.target_word_count = Some(900);
        assert_eq!(req.base_target_words(), 900);
    }

    #[test]
    fn test_choose_format_prefers_explicit_then_recommendation() {
        let mut req = request("what the politician hid");
        assert_eq!(choose_format(&req).0, "Documentary Format");

        req.format = Some("Rant".to_string());
        assert_eq!(choose_format(&req).0, "Rant");

        assert_eq!(choose_format(&request("zzz")).0, DEFAULT_FORMAT);
    }

    #[test]
    fn test_prompt_is_deterministic_for_a_seed() {
        let req = request("home workouts");
        let v = PromptVariation::from_seed(11, req.base_target_words());
        let a = build_generation_prompt(&req, &v, &[], "F", "S");
        let b = build_generation_prompt(&req, &v, &[], "F", "S");
        assert_eq!(a, b);
        assert!(a.contains("TOPIC: home workouts"));
        assert!(a.contains(&v.target_word_count.to_string()));
        assert!(!a.contains("{topic}"));
    }

    #[test]
    fn test_placeholder_text_in_user_fields_is_kept_literally() {
        let mut req = request("why {references} matter");
        req.description = Some("compare {tactics} and {target_word_count}".to_string());
        req.reference_scripts = vec!["Here is my reference.".to_string()];
        let v = PromptVariation::from_seed(3, req.base_target_words());
        let prompt = build_generation_prompt(&req, &v, &[], "F", "S");
        assert!(prompt.contains("TOPIC: why {references} matter"));
        assert!(prompt.contains("compare {tactics} and {target_word_count}"));
        assert!(!prompt.contains("TOPIC: why --- REFERENCE 1 ---"));
        assert_eq!(prompt.matches("--- REFERENCE 1 ---").count(), 1);
    }

    #[tokio::test]
    async fn test_same_seed_sends_same_prompt() {
        let llm = StubBackend::replying("A finished script.");
        let mut req = request("home workouts");
        req.seed = Some(5);

        generate_script(&llm, &req, None).await;
        generate_script(&llm, &req, None).await;

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
    }

    #[tokio::test]
    async fn test_request_seed_overrides_default() {
        let llm = StubBackend::replying("A finished script.");
        let mut req = request("home workouts");
        req.seed = Some(5);
        let response = generate_script(&llm, &req, Some(99)).await;
        assert_eq!(response.metrics.seed, 5);

        req.seed = None;
        let response = generate_script(&llm, &req, Some(99)).await;
        assert_eq!(response.metrics.seed, 99);
    }

    #[tokio::test]
    async fn test_llm_reply_is_used() {
        let llm = StubBackend::replying("  [HOOK]\nHome workouts beat the gym.  ");
        let response = generate_script(&llm, &request("home workouts"), Some(1)).await;
        assert_eq!(response.source, ScriptSource::Llm);
        assert!(response.success);
        assert_eq!(response.script, "[HOOK]\nHome workouts beat the gym.");
    }

    #[tokio::test]
    async fn test_falls_back_when_llm_fails() {
        let llm = StubBackend::failing();
        let response = generate_script(&llm, &request("personal finance"), Some(3)).await;

        assert!(response.success);
        assert_eq!(response.source, ScriptSource::Fallback);
        assert!(response.script.contains("personal finance"));
        assert!(response.script.contains(DEFAULT_CALL_TO_ACTION));
        assert!(word_count(&response.script) >= response.metrics.target_word_count);
    }

    #[tokio::test]
    async fn test_falls_back_on_empty_reply() {
        let llm = StubBackend::replying("   \n ");
        let response = generate_script(&llm, &request("personal finance"), Some(3)).await;
        assert_eq!(response.source, ScriptSource::Fallback);
        assert!(!response.script.trim().is_empty());
    }

    #[tokio::test]
    async fn test_reference_tactics_reach_the_prompt() {
        let llm = StubBackend::replying("ok");
        let mut req = request("saving money");
        req.reference_scripts = vec!["Stop scrolling right now and listen.".to_string()];

        let response = generate_script(&llm, &req, Some(1)).await;
        assert!(response
            .tactics_used
            .iter()
            .any(|t| t.name == "Pattern Interrupt"));

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Pattern Interrupt"));
        assert!(prompts[0].contains("--- REFERENCE 1 ---"));
    }
}
