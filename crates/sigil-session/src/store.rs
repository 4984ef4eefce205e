//! The persistence contract for session state.
//!
//! Sigil doesn't implement a persistence engine; that's your backend's
//! job (Redis, a SQL table, an in-process map, ...). Instead it defines
//! the [`Store`] trait: save, get, and delete of caller-defined state,
//! keyed by a token's [`SessionId`]. Implement it once for your backend
//! and the manager uses it unchanged.
//!
//! A store is the source of truth for whether a session exists. A token
//! whose state is gone (deleted or expired) is treated exactly like a
//! token that never had any.

use std::future::Future;
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use sigil_token::SessionId;

use crate::StoreError;

/// Saves, fetches, and deletes session state.
///
/// # Trait bounds
///
/// - `Send + Sync` → one store is shared by every request-handling task.
/// - `'static` → the store lives as long as the manager that owns it.
///
/// # Contract
///
/// - [`save`](Store::save) creates or replaces the state for `id`. When
///   two saves race on the same ID, the last one to complete wins.
/// - [`get`](Store::get) returns [`StoreError::NotFound`] when nothing is
///   stored for `id`. It must never hand back a default value instead.
/// - [`delete`](Store::delete) succeeds whether or not state exists.
///
/// Keys are usually derived from the ID's string form
/// (`id.to_string()`), optionally with a prefix so session keys don't
/// collide with anything else in a shared backend.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// use serde::{Serialize, de::DeserializeOwned};
/// use sigil_session::{JsonCodec, StateCodec, Store, StoreError};
/// use sigil_token::SessionId;
///
/// /// Keeps everything in a map with no expiry.
/// #[derive(Default)]
/// struct MapStore(Mutex<HashMap<String, Vec<u8>>>);
///
/// impl Store for MapStore {
///     async fn save<S>(&self, id: SessionId<'_>, state: &S) -> Result<(), StoreError>
///     where
///         S: Serialize + Sync + ?Sized,
///     {
///         let bytes = JsonCodec.encode(state)?;
///         self.0.lock().unwrap().insert(id.to_string(), bytes);
///         Ok(())
///     }
///
///     async fn get<S>(&self, id: SessionId<'_>) -> Result<S, StoreError>
///     where
///         S: DeserializeOwned + Send,
///     {
///         let map = self.0.lock().unwrap();
///         let bytes = map.get(&id.to_string()).ok_or(StoreError::NotFound)?;
///         JsonCodec.decode(bytes)
///     }
///
///     async fn delete(&self, id: SessionId<'_>) -> Result<(), StoreError> {
///         self.0.lock().unwrap().remove(&id.to_string());
///         Ok(())
///     }
/// }
/// ```
pub trait Store: Send + Sync + 'static {
    /// Saves `state` under `id`, replacing anything already there.
    fn save<S>(
        &self,
        id: SessionId<'_>,
        state: &S,
    ) -> impl Future<Output = Result<(), StoreError>> + Send
    where
        S: Serialize + Sync + ?Sized;

    /// Fetches the state previously saved under `id`.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if there is none; [`StoreError::Decode`]
    /// if it cannot be read back as `S`.
    fn get<S>(
        &self,
        id: SessionId<'_>,
    ) -> impl Future<Output = Result<S, StoreError>> + Send
    where
        S: DeserializeOwned + Send;

    /// Removes any state saved under `id`.
    fn delete(
        &self,
        id: SessionId<'_>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Lets a store be shared between a manager and other owners.
impl<T: Store> Store for Arc<T> {
    fn save<S>(
        &self,
        id: SessionId<'_>,
        state: &S,
    ) -> impl Future<Output = Result<(), StoreError>> + Send
    where
        S: Serialize + Sync + ?Sized,
    {
        (**self).save(id, state)
    }

    fn get<S>(
        &self,
        id: SessionId<'_>,
    ) -> impl Future<Output = Result<S, StoreError>> + Send
    where
        S: DeserializeOwned + Send,
    {
        (**self).get(id)
    }

    fn delete(
        &self,
        id: SessionId<'_>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).delete(id)
    }
}
