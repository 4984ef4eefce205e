//! In-process [`Store`] with optional sliding expiry.
//!
//! Useful for tests, demos, and single-instance services. State is
//! encoded through a [`StateCodec`] exactly as a networked store would,
//! so a type that works here will also round-trip through a real backend.
//!
//! Expiry behaves like a key-value store's TTL that is refreshed on read:
//! every successful `get` pushes the deadline out again, so idle sessions
//! expire and active ones don't. Expired entries are invisible to `get`
//! immediately; [`MemoryStore::purge_expired`] reclaims their memory.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use sigil_token::SessionId;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[cfg(feature = "json")]
use crate::JsonCodec;
use crate::{StateCodec, Store, StoreError};

// ---------------------------------------------------------------------------
// MemoryStoreConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStoreConfig {
    /// Prepended to every session ID to form the map key.
    ///
    /// Default: `"sid:"`.
    pub prefix: String,

    /// How long state survives without being read. `None` keeps it until
    /// it is deleted.
    ///
    /// Default: `None`.
    pub ttl: Option<Duration>,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            prefix: "sid:".to_string(),
            ttl: None,
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Entry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// A [`Store`] backed by a `HashMap` behind an async `RwLock`.
#[derive(Debug)]
pub struct MemoryStore<C> {
    entries: RwLock<HashMap<String, Entry>>,
    codec: C,
    config: MemoryStoreConfig,
}

#[cfg(feature = "json")]
impl MemoryStore<JsonCodec> {
    /// A JSON-encoding store with the default prefix and no expiry.
    pub fn new() -> Self {
        Self::with_codec(JsonCodec, MemoryStoreConfig::default())
    }

    /// A JSON-encoding store with custom settings.
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self::with_codec(JsonCodec, config)
    }
}

#[cfg(feature = "json")]
impl Default for MemoryStore<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: StateCodec> MemoryStore<C> {
    /// A store that encodes state with `codec`.
    pub fn with_codec(codec: C, config: MemoryStoreConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            codec,
            config,
        }
    }

    /// Returns the store's configuration.
    pub fn config(&self) -> &MemoryStoreConfig {
        &self.config
    }

    /// Number of entries held, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if the store holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Removes every expired entry and returns how many were removed.
    ///
    /// Call this periodically if sessions are created faster than they
    /// are read back; otherwise expired entries linger until touched.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before - entries.len();

        if purged > 0 {
            tracing::debug!(purged, "expired session state purged");
        }
        purged
    }

    fn key_for(&self, id: SessionId<'_>) -> String {
        format!("{}{}", self.config.prefix, id)
    }

    fn deadline(&self, now: Instant) -> Option<Instant> {
        self.config.ttl.map(|ttl| now + ttl)
    }
}

impl<C: StateCodec> Store for MemoryStore<C> {
    async fn save<S>(
        &self,
        id: SessionId<'_>,
        state: &S,
    ) -> Result<(), StoreError>
    where
        S: Serialize + Sync + ?Sized,
    {
        let data = self.codec.encode(state)?;
        let entry = Entry {
            data,
            expires_at: self.deadline(Instant::now()),
        };
        self.entries.write().await.insert(self.key_for(id), entry);
        Ok(())
    }

    async fn get<S>(&self, id: SessionId<'_>) -> Result<S, StoreError>
    where
        S: DeserializeOwned + Send,
    {
        let key = self.key_for(id);
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let Some(entry) = entries.get_mut(&key) else {
            return Err(StoreError::NotFound);
        };
        if entry.is_expired(now) {
            entries.remove(&key);
            return Err(StoreError::NotFound);
        }

        // Reading refreshes the deadline.
        if let Some(deadline) = self.deadline(now) {
            entry.expires_at = Some(deadline);
        }
        self.codec.decode(&entry.data)
    }

    async fn delete(&self, id: SessionId<'_>) -> Result<(), StoreError> {
        self.entries.write().await.remove(&self.key_for(id));
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(all(test, feature = "json"))]
mod tests {
    use serde::Deserialize;
    use sigil_token::{SigningKey, Token, codec};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        reqs: u32,
    }

    fn token() -> Token {
        codec::issue_default(&SigningKey::new("testsigningkey").unwrap())
            .unwrap()
    }

    fn user(reqs: u32) -> User {
        User {
            name: "tester".into(),
            reqs,
        }
    }

    fn store_with_ttl(secs: u64) -> MemoryStore<JsonCodec> {
        MemoryStore::with_config(MemoryStoreConfig {
            ttl: Some(Duration::from_secs(secs)),
            ..MemoryStoreConfig::default()
        })
    }

    #[tokio::test]
    async fn test_get_before_save_returns_not_found() {
        let store = MemoryStore::new();
        let token = token();

        let result: Result<User, _> = store.get(token.id()).await;

        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_save_get_update_delete_lifecycle() {
        let store = MemoryStore::new();
        let token = token();

        store.save(token.id(), &user(0)).await.unwrap();
        let fetched: User = store.get(token.id()).await.unwrap();
        assert_eq!(fetched, user(0));

        store.save(token.id(), &user(1)).await.unwrap();
        let fetched: User = store.get(token.id()).await.unwrap();
        assert_eq!(fetched, user(1));

        store.delete(token.id()).await.unwrap();
        let result: Result<User, _> = store.get(token.id()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_wrong_type_returns_decode_error() {
        let store = MemoryStore::new();
        let token = token();
        store.save(token.id(), &user(0)).await.unwrap();

        let result: Result<String, _> = store.get(token.id()).await;

        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_entry_succeeds() {
        let store = MemoryStore::new();
        assert!(store.delete(token().id()).await.is_ok());
    }

    #[tokio::test]
    async fn test_keys_are_prefixed_session_ids() {
        let store = MemoryStore::new();
        let token = token();
        store.save(token.id(), &user(0)).await.unwrap();

        let entries = store.entries.read().await;
        let expected = format!("sid:{}", token.id());
        assert!(entries.contains_key(&expected));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_by_id() {
        let store = MemoryStore::new();
        let (a, b) = (token(), token());
        store.save(a.id(), &user(1)).await.unwrap();
        store.save(b.id(), &user(2)).await.unwrap();

        store.delete(a.id()).await.unwrap();

        let fetched: User = store.get(b.id()).await.unwrap();
        assert_eq!(fetched, user(2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_after_ttl_returns_not_found() {
        let store = store_with_ttl(60);
        let token = token();
        store.save(token.id(), &user(0)).await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;

        let result: Result<User, _> = store.get(token.id()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
        // The expired entry was dropped on access.
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_refreshes_ttl() {
        let store = store_with_ttl(60);
        let token = token();
        store.save(token.id(), &user(0)).await.unwrap();

        // Read every 40s: each read pushes the deadline 60s further out.
        for _ in 0..3 {
            tokio::time::advance(Duration::from_secs(40)).await;
            let fetched: User = store.get(token.id()).await.unwrap();
            assert_eq!(fetched, user(0));
        }

        tokio::time::advance(Duration::from_secs(61)).await;
        let result: Result<User, _> = store.get(token.id()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_removes_only_stale_entries() {
        let store = store_with_ttl(60);
        let (stale, fresh) = (token(), token());
        store.save(stale.id(), &user(0)).await.unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;
        store.save(fresh.id(), &user(1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
        let fetched: User = store.get(fresh.id()).await.unwrap();
        assert_eq!(fetched, user(1));
    }

    #[tokio::test]
    async fn test_no_ttl_never_expires() {
        let store = MemoryStore::new();
        let token = token();
        store.save(token.id(), &user(0)).await.unwrap();

        assert_eq!(store.purge_expired().await, 0);
        assert_eq!(store.config().ttl, None);
    }
}
