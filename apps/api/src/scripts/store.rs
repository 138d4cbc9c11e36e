//! Persistence of saved scripts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::fallback::word_count;

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScriptRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub industry: Option<String>,
    pub language: String,
    pub word_count: i32,
    pub created_at: DateTime<Utc>,
}

/// A validated script ready to insert. `word_count` is derived here, never trusted
/// from the client.
#[derive(Debug, Clone)]
pub struct NewScript {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub industry: Option<String>,
    pub language: String,
}

impl NewScript {
    pub fn word_count(&self) -> i32 {
        i32::try_from(word_count(&self.content)).unwrap_or(i32::MAX)
    }
}

#[async_trait]
pub trait ScriptStore: Send + Sync {
    async fn create(&self, script: NewScript) -> Result<ScriptRecord, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<ScriptRecord>, AppError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ScriptRecord>, AppError>;

    /// Returns `false` when no row had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgScriptStore {
    pool: PgPool,
}

impl PgScriptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScriptStore for PgScriptStore {
    async fn create(&self, script: NewScript) -> Result<ScriptRecord, AppError> {
        let word_count = script.word_count();
        let record = sqlx::query_as::<_, ScriptRecord>(
            r#"
            INSERT INTO scripts (id, user_id, title, content, industry, language, word_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(script.user_id)
        .bind(&script.title)
        .bind(&script.content)
        .bind(&script.industry)
        .bind(&script.language)
        .bind(word_count)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ScriptRecord>, AppError> {
        Ok(
            sqlx::query_as::<_, ScriptRecord>("SELECT * FROM scripts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ScriptRecord>, AppError> {
        Ok(sqlx::query_as::<_, ScriptRecord>(
            "SELECT * FROM scripts WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM scripts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryScriptStore {
        rows: Mutex<Vec<ScriptRecord>>,
    }

    #[async_trait]
    impl ScriptStore for MemoryScriptStore {
        async fn create(&self, script: NewScript) -> Result<ScriptRecord, AppError> {
            let record = ScriptRecord {
                id: Uuid::new_v4(),
                user_id: script.user_id,
                word_count: script.word_count(),
                title: script.title,
                content: script.content,
                industry: script.industry,
                language: script.language,
                created_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn get(&self, id: Uuid) -> Result<Option<ScriptRecord>, AppError> {
            Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }

        async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ScriptRecord>, AppError> {
            let mut rows: Vec<_> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect();
            rows.reverse();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            Ok(rows.len() != before)
        }
    }
}
