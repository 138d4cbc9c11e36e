//! Key-value store abstraction.
//!
//! Recent-script lists and login sessions live behind `KvStore` so the backing
//! store (Redis in production) is injected rather than ambient.

use std::time::Duration;

use async_trait::async_trait;
use redis::Client as RedisClient;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Stores `value`. With a TTL the store may drop the key once it elapses.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), KvError>;

    async fn delete(&self, key: &str) -> Result<(), KvError>;
}

/// Redis-backed store. Opens a multiplexed connection per call.
pub struct RedisKvStore {
    client: RedisClient,
}

impl RedisKvStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value = redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut conn)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), KvError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            // Redis rejects EX 0
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }
        cmd.query_async::<_, ()>(&mut conn).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, i64>(&mut conn)
            .await?;
        Ok(())
    }
}
