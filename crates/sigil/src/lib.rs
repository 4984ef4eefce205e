//! # Sigil
//!
//! Stateless, signed bearer-token sessions for HTTP services.
//!
//! Sigil hands each client an opaque token carried in the `Authorization`
//! header. The token is a random session ID plus an HMAC-SHA256 signature,
//! so forged or tampered tokens are rejected before any storage is
//! touched. The state behind a session lives in a [`Store`] you choose.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sigil::prelude::*;
//!
//! # async fn run(request: http::Request<()>) -> Result<(), SigilError> {
//! let sessions = SigilBuilder::new()
//!     .signing_key("change-me")
//!     .build(MemoryStore::new())?;
//!
//! // Sign in: state goes to the store, the token goes on the response.
//! let mut response = http::HeaderMap::new();
//! sessions.begin_session(&mut response, &"tester").await?;
//!
//! // Later requests: verify the token and load the state.
//! let (token, name): (Token, String) = sessions.get_state(&request).await?;
//!
//! // Sign out.
//! sessions.end_session_token(&token).await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;

pub use builder::SigilBuilder;
pub use error::SigilError;

pub use sigil_session as session;
pub use sigil_token as token;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `sigil=info`, which covers every Sigil crate. Does
/// nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sigil=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Everything needed to run sessions, in one import.
pub mod prelude {
    pub use crate::{SigilBuilder, SigilError, init_tracing};
    pub use sigil_session::bearer::{self, BearerSource};
    pub use sigil_session::{
        JsonCodec, MemoryStore, MemoryStoreConfig, SessionConfig,
        SessionError, SessionManager, StateCodec, Store, StoreError,
    };
    pub use sigil_token::{
        KeyRing, SessionId, SigningKey, Token, TokenError, codec,
    };
}
