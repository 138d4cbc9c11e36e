//! Account storage.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::auth::credentials::hash_password;
use crate::auth::models::{NewUser, Role, UserRecord};
use crate::config::BootstrapAdmin;
use crate::errors::AppError;

/// Lifetime of the account provisioned from configuration.
const BOOTSTRAP_ADMIN_VALID_DAYS: i64 = 3650;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError>;

    /// Fails with `Conflict` when the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, AppError>;

    /// Oldest first.
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError>;
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;
        Ok(UserRecord {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            expires_at: row.expires_at,
            created_at: row.created_at,
        })
    }
}

pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, AppError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, role, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.expires_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => UserRecord::try_from(row),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
                format!("Username '{}' already exists", user.username),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(UserRecord::try_from)
            .collect()
    }
}

/// Builds a `NewUser` with a freshly salted argon2 hash.
pub fn new_user(
    username: &str,
    password: &str,
    role: Role,
    expires_at: DateTime<Utc>,
) -> Result<NewUser, AppError> {
    Ok(NewUser {
        username: username.trim().to_string(),
        password_hash: hash_password(password)?,
        role,
        expires_at,
    })
}

/// Creates the configured admin account unless the username already exists.
/// An existing account is left untouched, password included.
pub async fn ensure_bootstrap_admin(
    store: &dyn IdentityStore,
    admin: &BootstrapAdmin,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if store.find_by_username(admin.username.trim()).await?.is_some() {
        info!("Bootstrap admin '{}' already exists", admin.username);
        return Ok(());
    }

    let user = new_user(
        &admin.username,
        &admin.password,
        Role::Admin,
        now + Duration::days(BOOTSTRAP_ADMIN_VALID_DAYS),
    )?;
    store.create_user(user).await?;
    info!("Provisioned bootstrap admin '{}'", admin.username);
    Ok(())
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryIdentityStore {
        users: Mutex<Vec<UserRecord>>,
    }

    #[async_trait]
    impl IdentityStore for MemoryIdentityStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn create_user(&self, user: NewUser) -> Result<UserRecord, AppError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == user.username) {
                return Err(AppError::Conflict(format!(
                    "Username '{}' already exists",
                    user.username
                )));
            }
            let record = UserRecord {
                id: Uuid::new_v4(),
                username: user.username,
                password_hash: user.password_hash,
                role: user.role,
                expires_at: user.expires_at,
                created_at: Utc::now(),
            };
            users.push(record.clone());
            Ok(record)
        }

        async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
            Ok(self.users.lock().unwrap().clone())
        }
    }
}
