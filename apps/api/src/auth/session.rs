//! Opaque bearer-token sessions stored in the key-value store.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::models::Principal;
use crate::kv::{KvError, KvStore};

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub principal: Principal,
    pub expires_at: DateTime<Utc>,
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// 64 hex characters of OS-seeded randomness.
pub fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Stores a new session. It ends after `ttl` or at account expiry, whichever is first.
pub async fn create_session(
    kv: &dyn KvStore,
    principal: Principal,
    account_expires_at: DateTime<Utc>,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<(String, Session), KvError> {
    let token = new_token();
    let session = Session {
        principal,
        expires_at: (now + ttl).min(account_expires_at),
    };

    let value = serde_json::to_string(&session)?;
    let lifetime = (session.expires_at - now).to_std().ok();
    kv.set(&session_key(&token), &value, lifetime).await?;

    Ok((token, session))
}

/// Returns the live session for `token`, if any.
pub async fn load_session(
    kv: &dyn KvStore,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Session>, KvError> {
    let Some(raw) = kv.get(&session_key(token)).await? else {
        return Ok(None);
    };
    let session: Session = match serde_json::from_str(&raw) {
        Ok(session) => session,
        Err(e) => {
            warn!("Discarding unreadable session: {e}");
            return Ok(None);
        }
    };
    if session.expires_at <= now {
        return Ok(None);
    }
    Ok(Some(session))
}

pub async fn revoke_session(kv: &dyn KvStore, token: &str) -> Result<(), KvError> {
    kv.delete(&session_key(token)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::kv::testing::MemoryKvStore;
    use uuid::Uuid;

    fn principal() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            username: "dana".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_tokens_are_long_and_distinct() {
        let a = new_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, new_token());
    }

    #[tokio::test]
    async fn test_create_then_load() {
        let kv = MemoryKvStore::default();
        let now = Utc::now();
        let (token, session) = create_session(
            &kv,
            principal(),
            now + Duration::days(30),
            Duration::hours(12),
            now,
        )
        .await
        .unwrap();

        assert_eq!(session.expires_at, now + Duration::hours(12));
        let loaded = load_session(&kv, &token, now).await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn test_session_capped_at_account_expiry() {
        let kv = MemoryKvStore::default();
        let now = Utc::now();
        let account_expiry = now + Duration::hours(1);
        let (token, session) =
            create_session(&kv, principal(), account_expiry, Duration::hours(12), now)
                .await
                .unwrap();

        assert_eq!(session.expires_at, account_expiry);
        assert!(load_session(&kv, &token, now + Duration::hours(2))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_revoked_and_unknown_tokens_do_not_load() {
        let kv = MemoryKvStore::default();
        let now = Utc::now();
        let (token, _) = create_session(
            &kv,
            principal(),
            now + Duration::days(1),
            Duration::hours(1),
            now,
        )
        .await
        .unwrap();

        revoke_session(&kv, &token).await.unwrap();
        assert!(load_session(&kv, &token, now).await.unwrap().is_none());
        assert!(load_session(&kv, "missing", now).await.unwrap().is_none());
    }
}
