//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::generation::generator::{generate_script, GenerateRequest, GenerateResponse};
use crate::state::AppState;

/// POST /api/v1/generate
///
/// Full generation pipeline: tactic match → synthesis → format → seeded prompt → LLM.
/// Falls back to the local expander when the LLM is unavailable, so only
/// validation failures produce an error response.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    request.validate()?;

    let response = generate_script(state.llm.as_ref(), &request, state.config.prompt_seed).await;

    Ok(Json(response))
}
