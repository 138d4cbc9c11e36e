//! Axum route handlers for saved scripts.
//!
//! Every route needs a session; non-admin callers only see their own scripts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::auth::models::Principal;
use crate::errors::AppError;
use crate::scripts::export::upload_script;
use crate::scripts::recent::{RecentScript, RecentScripts};
use crate::scripts::store::{NewScript, ScriptRecord, DEFAULT_LANGUAGE};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateScriptRequest {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub industry: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScriptListResponse {
    pub scripts: Vec<ScriptRecord>,
}

#[derive(Debug, Serialize)]
pub struct RecentListResponse {
    pub recent: Vec<RecentScript>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub s3_key: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn ensure_access(principal: &Principal, user_id: Uuid) -> Result<(), AppError> {
    if principal.can_access(user_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn recent_scripts(state: &AppState) -> RecentScripts<'_> {
    RecentScripts::new(
        state.kv.as_ref(),
        Duration::hours(state.config.recent_scripts_ttl_hours),
    )
}

/// Loads a script the caller is allowed to see.
async fn load_owned(state: &AppState, principal: &Principal, id: Uuid) -> Result<ScriptRecord, AppError> {
    let record = state
        .scripts
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Script {id} not found")))?;
    ensure_access(principal, record.user_id)?;
    Ok(record)
}

/// Non-blank and storable as Postgres `TEXT`, which rejects NUL.
fn validate_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    if value.contains('\0') {
        return Err(AppError::Validation(format!(
            "{field} cannot contain NUL characters"
        )));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/scripts
///
/// Title and content are stored exactly as sent. The recent list is best effort.
pub async fn handle_create_script(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateScriptRequest>,
) -> Result<(StatusCode, Json<ScriptRecord>), AppError> {
    ensure_access(&auth.principal, request.user_id)?;
    validate_text("title", &request.title)?;
    validate_text("content", &request.content)?;

    let record = state
        .scripts
        .create(NewScript {
            user_id: request.user_id,
            title: request.title,
            content: request.content,
            industry: non_blank(request.industry),
            language: non_blank(request.language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        })
        .await?;
    info!(
        "Saved script {} ({} words) for user {}",
        record.id, record.word_count, record.user_id
    );

    if let Err(e) = recent_scripts(&state)
        .record(record.user_id, &record, Utc::now())
        .await
    {
        warn!("Failed to update recent scripts for user {}: {e}", record.user_id);
    }

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/scripts?user_id=
pub async fn handle_list_scripts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ScriptListResponse>, AppError> {
    ensure_access(&auth.principal, params.user_id)?;
    let scripts = state.scripts.list_for_user(params.user_id).await?;
    Ok(Json(ScriptListResponse { scripts }))
}

/// GET /api/v1/scripts/:id
pub async fn handle_get_script(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ScriptRecord>, AppError> {
    Ok(Json(load_owned(&state, &auth.principal, id).await?))
}

/// DELETE /api/v1/scripts/:id
pub async fn handle_delete_script(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let record = load_owned(&state, &auth.principal, id).await?;
    if !state.scripts.delete(id).await? {
        return Err(AppError::NotFound(format!("Script {id} not found")));
    }
    info!("Deleted script {} for user {}", id, record.user_id);

    if let Err(e) = recent_scripts(&state)
        .forget(record.user_id, id, Utc::now())
        .await
    {
        warn!("Failed to update recent scripts for user {}: {e}", record.user_id);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/scripts/recent?user_id=
pub async fn handle_recent_scripts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RecentListResponse>, AppError> {
    ensure_access(&auth.principal, params.user_id)?;
    let recent = recent_scripts(&state)
        .list(params.user_id, Utc::now())
        .await?;
    Ok(Json(RecentListResponse { recent }))
}

/// POST /api/v1/scripts/:id/export
pub async fn handle_export_script(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AppError> {
    let record = load_owned(&state, &auth.principal, id).await?;
    let s3_key = upload_script(&state.s3, &state.config.s3_bucket, &record).await?;
    Ok(Json(ExportResponse { s3_key }))
}
