//! Session lifecycle for Sigil.
//!
//! This crate turns signed tokens into server-side sessions:
//!
//! 1. **Issuing** — [`SessionManager::begin_session`] mints a token, saves
//!    the caller's state under its ID, and writes `Authorization: Bearer`
//!    onto the response
//! 2. **Recognizing** — tokens are read back from the `Authorization`
//!    header or the `auth` query parameter ([`bearer`]) and verified
//!    against the signing key ring
//! 3. **Persisting** — state lives behind the [`Store`] trait;
//!    [`MemoryStore`] is provided for tests and single-instance services
//!
//! # How it fits in the stack
//!
//! ```text
//! Your handlers (above)  ← call begin/get/update/end on the manager
//!     ↕
//! Session layer (this crate)  ← requests, headers, stores, state
//!     ↕
//! Token layer (below)  ← Token, SessionId, KeyRing, HMAC wire format
//! ```
//!
//! State is any `serde` type. The manager never inspects it.

pub mod bearer;
mod codec;
mod config;
mod error;
mod manager;
mod memory;
mod store;
#[cfg(all(feature = "json", any(test, feature = "testutil")))]
pub mod testutil;

pub use bearer::BearerSource;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use codec::StateCodec;
pub use config::SessionConfig;
pub use error::{BoxError, SessionError, StoreError};
pub use manager::SessionManager;
pub use memory::{MemoryStore, MemoryStoreConfig};
pub use store::Store;

pub use sigil_token::{KeyRing, SessionId, SigningKey, Token};
