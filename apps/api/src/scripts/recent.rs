//! Per-user list of recently saved scripts, kept in the key-value store.
//!
//! Entries older than the TTL are dropped on every read. Eviction itself is the
//! pure function `evict_expired`; this module only loads and stores the list.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::kv::{KvError, KvStore};
use crate::scripts::store::ScriptRecord;

pub const MAX_RECENT: usize = 10;
const PREVIEW_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentScript {
    pub script_id: Uuid,
    pub title: String,
    pub preview: String,
    pub saved_at: DateTime<Utc>,
}

impl RecentScript {
    pub fn from_record(record: &ScriptRecord, saved_at: DateTime<Utc>) -> Self {
        Self {
            script_id: record.id,
            title: record.title.clone(),
            preview: preview(&record.content),
            saved_at,
        }
    }
}

/// First `PREVIEW_CHARS` characters with whitespace collapsed.
fn preview(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

/// Keeps the records no older than `ttl` at `now`, preserving order.
pub fn evict_expired(
    now: DateTime<Utc>,
    records: Vec<RecentScript>,
    ttl: Duration,
) -> Vec<RecentScript> {
    records
        .into_iter()
        .filter(|r| now.signed_duration_since(r.saved_at) <= ttl)
        .collect()
}

fn recent_key(user_id: Uuid) -> String {
    format!("recent_scripts:{user_id}")
}

/// Recent-list operations over an injected store.
///
/// `record` and `forget` read the whole list and write it back without locking,
/// so two concurrent updates for one user can drop an entry. The list is best
/// effort; saved scripts themselves are unaffected.
pub struct RecentScripts<'a> {
    kv: &'a dyn KvStore,
    ttl: Duration,
}

impl<'a> RecentScripts<'a> {
    pub fn new(kv: &'a dyn KvStore, ttl: Duration) -> Self {
        Self { kv, ttl }
    }

    /// Newest first, after eviction. Rewrites the stored list when anything expired.
    pub async fn list(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<RecentScript>, KvError> {
        let stored = self.load(user_id).await?;
        let before = stored.len();
        let live = evict_expired(now, stored, self.ttl);
        if live.len() != before {
            self.save(user_id, &live).await?;
        }
        Ok(live)
    }

    /// Puts `record` at the front, replacing any older entry for the same script.
    pub async fn record(
        &self,
        user_id: Uuid,
        record: &ScriptRecord,
        now: DateTime<Utc>,
    ) -> Result<(), KvError> {
        let mut entries = evict_expired(now, self.load(user_id).await?, self.ttl);
        entries.retain(|e| e.script_id != record.id);
        entries.insert(0, RecentScript::from_record(record, now));
        entries.truncate(MAX_RECENT);
        self.save(user_id, &entries).await
    }

    pub async fn forget(
        &self,
        user_id: Uuid,
        script_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), KvError> {
        let mut entries = evict_expired(now, self.load(user_id).await?, self.ttl);
        entries.retain(|e| e.script_id != script_id);
        self.save(user_id, &entries).await
    }

    async fn load(&self, user_id: Uuid) -> Result<Vec<RecentScript>, KvError> {
        let Some(raw) = self.kv.get(&recent_key(user_id)).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Discarding unreadable recent-scripts list for user {user_id}: {e}");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, user_id: Uuid, entries: &[RecentScript]) -> Result<(), KvError> {
        let key = recent_key(user_id);
        if entries.is_empty() {
            return self.kv.delete(&key).await;
        }
        let value = serde_json::to_string(entries)?;
        self.kv.set(&key, &value, self.ttl.to_std().ok()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::testing::MemoryKvStore;

    fn at(hours: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::hours(hours)
    }

    fn entry(title: &str, saved_at: DateTime<Utc>) -> RecentScript {
        RecentScript {
            script_id: Uuid::new_v4(),
            title: title.to_string(),
            preview: String::new(),
            saved_at,
        }
    }

    fn record(title: &str) -> ScriptRecord {
        ScriptRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            content: "Some content".to_string(),
            industry: None,
            language: "en".to_string(),
            word_count: 2,
            created_at: at(0),
        }
    }

    #[test]
    fn test_evict_keeps_entries_within_ttl_in_order() {
        let records = vec![entry("new", at(20)), entry("old", at(0)), entry("mid", at(10))];
        let survivors = evict_expired(at(25), records, Duration::hours(24));
        let titles: Vec<_> = survivors.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid"]);
    }

    #[test]
    fn test_evict_boundary_is_inclusive() {
        let survivors = evict_expired(at(24), vec![entry("edge", at(0))], Duration::hours(24));
        assert_eq!(survivors.len(), 1);
        let survivors = evict_expired(
            at(24) + Duration::seconds(1),
            vec![entry("edge", at(0))],
            Duration::hours(24),
        );
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_evict_empty_input() {
        assert!(evict_expired(at(0), Vec::new(), Duration::hours(24)).is_empty());
    }

    #[test]
    fn test_preview_truncates_and_collapses_whitespace() {
        assert_eq!(preview("a\n\n b"), "a b");
        let long = "word ".repeat(100);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
    }

    #[tokio::test]
    async fn test_record_then_list_newest_first() {
        let kv = MemoryKvStore::default();
        let recent = RecentScripts::new(&kv, Duration::hours(24));
        let user = Uuid::new_v4();

        let a = record("a");
        let b = record("b");
        recent.record(user, &a, at(0)).await.unwrap();
        recent.record(user, &b, at(1)).await.unwrap();
        recent.record(user, &a, at(2)).await.unwrap();

        let listed = recent.list(user, at(3)).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.script_id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_list_evicts_expired_entries() {
        let kv = MemoryKvStore::default();
        let recent = RecentScripts::new(&kv, Duration::hours(24));
        let user = Uuid::new_v4();

        recent.record(user, &record("stale"), at(0)).await.unwrap();
        recent.record(user, &record("fresh"), at(20)).await.unwrap();

        let listed = recent.list(user, at(30)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "fresh");
    }

    #[tokio::test]
    async fn test_list_is_capped() {
        let kv = MemoryKvStore::default();
        let recent = RecentScripts::new(&kv, Duration::hours(24));
        let user = Uuid::new_v4();

        for i in 0..(MAX_RECENT + 3) {
            recent
                .record(user, &record(&format!("s{i}")), at(0))
                .await
                .unwrap();
        }
        let listed = recent.list(user, at(1)).await.unwrap();
        assert_eq!(listed.len(), MAX_RECENT);
        assert_eq!(listed[0].title, format!("s{}", MAX_RECENT + 2));
    }

    #[tokio::test]
    async fn test_forget_removes_entry() {
        let kv = MemoryKvStore::default();
        let recent = RecentScripts::new(&kv, Duration::hours(24));
        let user = Uuid::new_v4();
        let a = record("a");

        recent.record(user, &a, at(0)).await.unwrap();
        recent.forget(user, a.id, at(1)).await.unwrap();
        assert!(recent.list(user, at(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_list_reads_as_empty() {
        let kv = MemoryKvStore::default();
        let user = Uuid::new_v4();
        kv.set(&recent_key(user), "not json", None).await.unwrap();

        let recent = RecentScripts::new(&kv, Duration::hours(24));
        assert!(recent.list(user, at(0)).await.unwrap().is_empty());
    }
}
