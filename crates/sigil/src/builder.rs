//! `SigilBuilder`: configuration, keys, and a store in; a manager out.
//!
//! This is the entry point for setting up sessions. Nothing is checked
//! until [`SigilBuilder::build`], which validates everything at once.

use std::fmt;

use sigil_session::{SessionConfig, SessionError, SessionManager, Store};
use sigil_token::KeyRing;

use crate::SigilError;

/// Builder for a [`SessionManager`].
///
/// # Example
///
/// ```rust
/// use sigil::prelude::*;
///
/// let sessions = SigilBuilder::new()
///     .id_length(24)
///     .signing_keys(["current-key", "previous-key"])
///     .build(MemoryStore::new())
///     .unwrap();
///
/// assert_eq!(sessions.keys().len(), 2);
/// assert_eq!(sessions.config().id_length, 24);
/// ```
#[derive(Clone, Default)]
pub struct SigilBuilder {
    config: SessionConfig,
    keys: Vec<Vec<u8>>,
}

impl SigilBuilder {
    /// Creates a new builder with default settings and no keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the length in bytes of new session IDs.
    pub fn id_length(mut self, id_length: usize) -> Self {
        self.config.id_length = id_length;
        self
    }

    /// Adds a signing key to the end of the ring.
    pub fn signing_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Adds several signing keys, in order.
    pub fn signing_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Vec<u8>>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Validates the settings and builds a manager over `store`.
    ///
    /// # Errors
    /// Returns [`SessionError::Config`] (wrapped in [`SigilError`]) if no
    /// key was given, a key is empty, or the ID length is too short.
    pub fn build<St: Store>(
        self,
        store: St,
    ) -> Result<SessionManager<St>, SigilError> {
        let keys = KeyRing::new(self.keys).map_err(SessionError::Config)?;
        let key_count = keys.len();
        let id_length = self.config.id_length;

        let manager = SessionManager::new(self.config, keys, store)?;

        tracing::info!(keys = key_count, id_length, "session manager built");
        Ok(manager)
    }
}

impl fmt::Debug for SigilBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigilBuilder")
            .field("config", &self.config)
            .field("keys", &self.keys.len())
            .finish()
    }
}
