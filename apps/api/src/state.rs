use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::auth::store::IdentityStore;
use crate::config::Config;
use crate::kv::KvStore;
use crate::llm_client::CompletionBackend;
use crate::scripts::store::ScriptStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every external dependency sits behind a trait so tests can swap in memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionBackend>,
    /// Sessions and recent-script lists. Redis in production.
    pub kv: Arc<dyn KvStore>,
    pub scripts: Arc<dyn ScriptStore>,
    pub identities: Arc<dyn IdentityStore>,
    pub s3: S3Client,
    pub config: Config,
}
