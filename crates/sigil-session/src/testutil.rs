//! Test helpers for code built on the session layer.
//!
//! Enabled for this crate's own tests and, for other crates, through the
//! `testutil` feature (as a dev-dependency only).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Serialize, de::DeserializeOwned};
use sigil_token::SessionId;

use crate::{JsonCodec, MemoryStore, Store, StoreError};

/// A [`MemoryStore`] that counts calls and can be told to fail.
///
/// While failing, every operation returns [`StoreError::Backend`] without
/// touching the stored state. Counters include failed calls.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore<JsonCodec>,
    failing: AtomicBool,
    saves: AtomicUsize,
    gets: AtomicUsize,
    deletes: AtomicUsize,
}

impl RecordingStore {
    /// A working store with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `save` calls so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of `get` calls so far.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `delete` calls so far.
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Number of sessions currently held.
    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    /// Returns `true` if no session state is held.
    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected store failure".into()));
        }
        Ok(())
    }
}

impl Store for RecordingStore {
    async fn save<S>(
        &self,
        id: SessionId<'_>,
        state: &S,
    ) -> Result<(), StoreError>
    where
        S: Serialize + Sync + ?Sized,
    {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.save(id, state).await
    }

    async fn get<S>(&self, id: SessionId<'_>) -> Result<S, StoreError>
    where
        S: DeserializeOwned + Send,
    {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(id).await
    }

    async fn delete(&self, id: SessionId<'_>) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.delete(id).await
    }
}
