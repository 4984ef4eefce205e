//! Session manager configuration.

use serde::{Deserialize, Serialize};
use sigil_token::{DEFAULT_ID_LENGTH, MIN_ID_LENGTH, TokenError};

use crate::SessionError;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`SessionManager`](crate::SessionManager).
///
/// Serializable so a host can embed it in its own configuration file;
/// missing fields take their defaults. Signing keys are deliberately not
/// part of this struct: they are secrets and are handed to the manager
/// separately as a [`KeyRing`](sigil_token::KeyRing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Length in bytes of newly generated session IDs.
    ///
    /// Default: 32. Must be at least 16.
    pub id_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id_length: DEFAULT_ID_LENGTH,
        }
    }
}

impl SessionConfig {
    /// Create a config with a specific ID length.
    pub fn with_id_length(id_length: usize) -> Self {
        Self { id_length }
    }

    /// Checks the config before a manager is built from it.
    ///
    /// # Errors
    /// Returns [`SessionError::Config`] if `id_length` is below the
    /// minimum.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.id_length < MIN_ID_LENGTH {
            return Err(SessionError::Config(TokenError::InvalidLength {
                min: MIN_ID_LENGTH,
                actual: self.id_length,
            }));
        }
        Ok(())
    }
}
