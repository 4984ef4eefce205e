//! Unified error type for the Sigil façade.

use sigil_session::{SessionError, StoreError};
use sigil_token::TokenError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `sigil` crate you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impls, so `?` converts
/// sub-crate errors automatically.
///
/// [`SigilBuilder`](crate::SigilBuilder) and the session manager only ever
/// produce [`SigilError::Session`]. The `Token` and `Store` variants are
/// for code that calls the prelude's `codec` functions or a [`Store`]
/// directly.
///
/// [`Store`]: sigil_session::Store
#[derive(Debug, thiserror::Error)]
pub enum SigilError {
    /// A token-level error from calling `codec` or `KeyRing` directly.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A session-level error (no token, wrong scheme, store failure).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A store error from calling a [`Store`](sigil_session::Store)
    /// directly.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SigilError {
    /// `true` when the request simply has no usable session.
    ///
    /// See [`SessionError::is_unauthenticated`].
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            Self::Session(e) => e.is_unauthenticated(),
            Self::Store(StoreError::NotFound) => true,
            Self::Token(_) | Self::Store(_) => false,
        }
    }
}
