pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::generation::handlers as generation;
use crate::scripts::handlers as scripts;
use crate::state::AppState;
use crate::tactics::handlers as tactics;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tactics & formats (pure, no session required)
        .route("/api/v1/tactics", get(tactics::handle_catalog))
        .route("/api/v1/tactics/match", post(tactics::handle_match))
        .route("/api/v1/tactics/synthesize", post(tactics::handle_synthesize))
        .route("/api/v1/tactics/:name", get(tactics::handle_get_tactic))
        .route("/api/v1/formats/recommend", post(tactics::handle_recommend))
        // LLM-backed
        .route("/api/v1/analyze", post(tactics::handle_analyze))
        .route("/api/v1/generate", post(generation::handle_generate))
        // Identity
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route(
            "/api/v1/admin/users",
            get(auth::handle_list_users).post(auth::handle_create_user),
        )
        // Saved scripts
        .route(
            "/api/v1/scripts",
            get(scripts::handle_list_scripts).post(scripts::handle_create_script),
        )
        .route("/api/v1/scripts/recent", get(scripts::handle_recent_scripts))
        .route(
            "/api/v1/scripts/:id",
            get(scripts::handle_get_script).delete(scripts::handle_delete_script),
        )
        .route(
            "/api/v1/scripts/:id/export",
            post(scripts::handle_export_script),
        )
        .with_state(state)
}
