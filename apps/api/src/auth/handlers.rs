//! Axum route handlers for login, sessions, and account administration.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::credentials::{check_login, LoginRejection, MIN_PASSWORD_LEN};
use crate::auth::extract::{AdminUser, AuthUser};
use crate::auth::models::{Principal, Role, UserSummary};
use crate::auth::session::{create_session, revoke_session};
use crate::auth::store::new_user;
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_ACCOUNT_DAYS: i64 = 30;
const MAX_ACCOUNT_DAYS: i64 = 3650;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub principal: Principal,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub valid_for_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let now = Utc::now();
    let user = state.identities.find_by_username(username).await?;
    let principal = match check_login(user.as_ref(), &request.password, now) {
        Ok(principal) => principal,
        Err(LoginRejection::Expired) => {
            warn!("Login rejected for expired account '{username}'");
            return Err(AppError::Unauthorized);
        }
        Err(LoginRejection::InvalidCredentials) => {
            warn!("Login rejected for '{username}': invalid credentials");
            return Err(AppError::Unauthorized);
        }
    };

    // check_login only succeeds for an existing user
    let account_expires_at = user.map(|u| u.expires_at).unwrap_or(now);
    let ttl = Duration::hours(state.config.session_ttl_hours);
    let (token, session) =
        create_session(state.kv.as_ref(), principal, account_expires_at, ttl, now).await?;

    info!("User '{}' signed in", session.principal.username);
    Ok(Json(LoginResponse {
        token,
        principal: session.principal,
        expires_at: session.expires_at,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    revoke_session(state.kv.as_ref(), &auth.token).await?;
    info!("User '{}' signed out", auth.principal.username);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(auth: AuthUser) -> Json<Principal> {
    Json(auth.principal)
}

/// POST /api/v1/admin/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserSummary>), AppError> {
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("username cannot be empty".to_string()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let days = request.valid_for_days.unwrap_or(DEFAULT_ACCOUNT_DAYS);
    if !(1..=MAX_ACCOUNT_DAYS).contains(&days) {
        return Err(AppError::Validation(format!(
            "valid_for_days must be between 1 and {MAX_ACCOUNT_DAYS}"
        )));
    }

    let user = new_user(
        &request.username,
        &request.password,
        request.role,
        Utc::now() + Duration::days(days),
    )?;
    let created = state.identities.create_user(user).await?;

    info!(
        "Admin '{}' provisioned {} '{}' until {}",
        admin.username, created.role, created.username, created.expires_at
    );
    Ok((StatusCode::CREATED, Json(UserSummary::from(&created))))
}

/// GET /api/v1/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state.identities.list_users().await?;
    Ok(Json(UserListResponse {
        users: users.iter().map(UserSummary::from).collect(),
    }))
}
