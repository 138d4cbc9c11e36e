use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub recent_scripts_ttl_hours: i64,
    pub session_ttl_hours: i64,
    /// Fixed seed for prompt variation. `None` draws a fresh seed per request.
    pub prompt_seed: Option<u64>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the admin account provisioned at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            recent_scripts_ttl_hours: parse_env_or("RECENT_SCRIPTS_TTL_HOURS", 24)?,
            session_ttl_hours: parse_env_or("SESSION_TTL_HOURS", 12)?,
            prompt_seed: optional_env("PROMPT_SEED")
                .map(|s| s.parse::<u64>())
                .transpose()
                .context("PROMPT_SEED must be an unsigned integer")?,
            bootstrap_admin: bootstrap_admin_from(
                optional_env("BOOTSTRAP_ADMIN_USERNAME"),
                optional_env("BOOTSTRAP_ADMIN_PASSWORD"),
            )?,
        })
    }
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for router tests. Nothing here is dialled.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/scriptcraft_test".to_string(),
            redis_url: "redis://localhost".to_string(),
            s3_bucket: "scriptcraft-test".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            recent_scripts_ttl_hours: 24,
            session_ttl_hours: 12,
            prompt_seed: Some(7),
            bootstrap_admin: None,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env_or(key: &str, default: i64) -> Result<i64> {
    let value = match optional_env(key) {
        Some(raw) => raw
            .parse::<i64>()
            .with_context(|| format!("{key} must be an integer"))?,
        None => default,
    };
    if value <= 0 {
        bail!("{key} must be positive, got {value}");
    }
    Ok(value)
}

fn bootstrap_admin_from(
    username: Option<String>,
    password: Option<String>,
) -> Result<Option<BootstrapAdmin>> {
    match (username, password) {
        (Some(username), Some(password)) => Ok(Some(BootstrapAdmin { username, password })),
        (None, None) => Ok(None),
        _ => bail!(
            "BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together"
        ),
    }
}
