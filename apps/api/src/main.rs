mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod kv;
mod llm_client;
mod routes;
mod scripts;
mod state;
mod tactics;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::store::{ensure_bootstrap_admin, PgIdentityStore};
use crate::config::Config;
use crate::db::create_pool;
use crate::kv::RedisKvStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scripts::store::PgScriptStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scriptcraft API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    match config.prompt_seed {
        Some(seed) => info!("Prompt variation pinned to seed {seed}"),
        None => info!("Prompt variation uses a fresh seed per request"),
    }

    let identities = Arc::new(PgIdentityStore::new(db.clone()));
    if let Some(admin) = &config.bootstrap_admin {
        ensure_bootstrap_admin(&*identities, admin, Utc::now())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to provision bootstrap admin: {e}"))?;
    }

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        kv: Arc::new(RedisKvStore::new(redis)),
        scripts: Arc::new(PgScriptStore::new(db)),
        identities,
        s3,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "scriptcraft-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
