//! Axum route handlers for the tactic and format APIs.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tactics::analysis::{analyze_scripts, ScriptAnalysis};
use crate::tactics::catalog::{all_tactics, find_tactic, Tactic};
use crate::tactics::formats::{recommend, FormatRecommendation};
use crate::tactics::matcher::match_tactics;
use crate::tactics::synthesizer::synthesize;

/// Upper bound on reference scripts per request.
pub const MAX_REFERENCE_SCRIPTS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub tactics: Vec<Tactic>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub script: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub tactics: Vec<Tactic>,
}

#[derive(Debug, Deserialize)]
pub struct ScriptsRequest {
    pub scripts: Vec<String>,
}

/// Keyword matches per script plus their merged ranking.
#[derive(Debug, Serialize)]
pub struct HeuristicSynthesis {
    pub per_script: Vec<Vec<Tactic>>,
    pub synthesis: Vec<Tactic>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub angle: String,
    #[serde(default)]
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<FormatRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub heuristic: HeuristicSynthesis,
    pub analysis: ScriptAnalysis,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Rejects empty batches, blank scripts, and oversized batches.
pub fn validate_scripts(scripts: &[String]) -> Result<(), AppError> {
    if scripts.is_empty() {
        return Err(AppError::Validation(
            "scripts must contain at least one script".to_string(),
        ));
    }
    if scripts.len() > MAX_REFERENCE_SCRIPTS {
        return Err(AppError::Validation(format!(
            "at most {MAX_REFERENCE_SCRIPTS} scripts may be submitted"
        )));
    }
    if let Some(i) = scripts.iter().position(|s| s.trim().is_empty()) {
        return Err(AppError::Validation(format!("scripts[{i}] cannot be empty")));
    }
    Ok(())
}

fn heuristic_synthesis(scripts: &[String]) -> HeuristicSynthesis {
    let per_script: Vec<Vec<Tactic>> = scripts.iter().map(|s| match_tactics(s)).collect();
    let synthesis = synthesize(&per_script);
    HeuristicSynthesis {
        per_script,
        synthesis,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/tactics
pub async fn handle_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        tactics: all_tactics(),
    })
}

/// GET /api/v1/tactics/:name
pub async fn handle_get_tactic(Path(name): Path<String>) -> Result<Json<Tactic>, AppError> {
    find_tactic(&name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Tactic '{name}' not found")))
}

/// POST /api/v1/tactics/match
///
/// Any text is accepted; an empty script simply matches nothing.
pub async fn handle_match(Json(request): Json<MatchRequest>) -> Json<MatchResponse> {
    Json(MatchResponse {
        tactics: match_tactics(&request.script),
    })
}

/// POST /api/v1/tactics/synthesize
pub async fn handle_synthesize(
    Json(request): Json<ScriptsRequest>,
) -> Result<Json<HeuristicSynthesis>, AppError> {
    validate_scripts(&request.scripts)?;
    Ok(Json(heuristic_synthesis(&request.scripts)))
}

/// POST /api/v1/formats/recommend
pub async fn handle_recommend(Json(request): Json<RecommendRequest>) -> Json<RecommendResponse> {
    Json(RecommendResponse {
        recommendations: recommend(&request.topic, &request.angle, &request.goal),
    })
}

/// POST /api/v1/analyze
///
/// Keyword heuristics run locally; the LLM analysis falls back to a canned
/// result, so this only fails on invalid input.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<ScriptsRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    validate_scripts(&request.scripts)?;

    let heuristic = heuristic_synthesis(&request.scripts);
    let analysis = analyze_scripts(state.llm.as_ref(), &request.scripts).await;

    Ok(Json(AnalyzeResponse {
        heuristic,
        analysis,
    }))
}
