//! Serialization of session state for byte-oriented stores.
//!
//! The session layer never looks inside session state; it only needs a
//! way to turn it into bytes and back so a store can keep it. That is the
//! [`StateCodec`] trait. [`JsonCodec`] is provided; a binary codec can be
//! dropped in without touching the manager or the store.

use serde::{Serialize, de::DeserializeOwned};

use crate::StoreError;

/// Encodes caller-defined session state to bytes and decodes it back.
///
/// Generic methods keep the caller's state type intact end to end: what
/// goes into [`encode`](StateCodec::encode) comes back out of
/// [`decode`](StateCodec::decode) as the same Rust type, with no dynamic
/// typing in between.
pub trait StateCodec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`StoreError::Encode`] if the value cannot be represented.
    fn encode<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, StoreError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`StoreError::Decode`] if the bytes are malformed or do not
    /// match `T`.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, StoreError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`StateCodec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ```rust
/// use sigil_session::{JsonCodec, StateCodec};
///
/// let bytes = JsonCodec.encode(&("tester", 3)).unwrap();
/// let back: (String, u32) = JsonCodec.decode(&bytes).unwrap();
/// assert_eq!(back, ("tester".to_string(), 3));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl StateCodec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(value).map_err(|e| StoreError::Encode(e.into()))
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, StoreError> {
        serde_json::from_slice(data).map_err(|e| StoreError::Decode(e.into()))
    }
}
