//! Error types for the session layer.

use sigil_token::TokenError;

/// Boxed error from a store backend or a state codec.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while managing a session.
///
/// These cover the whole lifecycle: configuring the manager, issuing a
/// token, pulling a token out of a request, and talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The manager was configured with values it cannot work with, such
    /// as an ID length below the minimum or an empty signing key.
    #[error("invalid session configuration: {0}")]
    Config(#[source] TokenError),

    /// A new token could not be issued (for example the random source
    /// failed). Nothing was written to the store.
    #[error("error generating new token: {0}")]
    Issue(#[source] TokenError),

    /// The request carries no token, neither in the `Authorization`
    /// header nor in the `auth` query parameter.
    ///
    /// Usually not a failure at all: treat the caller as anonymous.
    #[error("no session token")]
    NoToken,

    /// The credential does not use the `Bearer` scheme.
    #[error("unsupported session token type")]
    UnsupportedTokenType,

    /// The token failed verification against every signing key.
    ///
    /// The inner error is the failure from the last key tried; it is kept
    /// for diagnostics and should not be shown to clients.
    #[error("invalid session token")]
    InvalidToken(#[source] TokenError),

    /// The response header could not be built from the token.
    #[error("invalid authorization header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),

    /// The store reported an error. Passed through as-is, never retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// `true` for every outcome that means "this request has no usable
    /// session": no token, wrong scheme, a token that does not verify, or
    /// a token whose state is gone.
    ///
    /// Integrations should answer all of these the same way (anonymous,
    /// or 401) so that clients learn nothing about key validity or whether
    /// a session ever existed.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::NoToken
                | Self::UnsupportedTokenType
                | Self::InvalidToken(_)
                | Self::Store(StoreError::NotFound)
        )
    }
}

/// Errors reported by a [`Store`](crate::Store).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No state is stored under the session ID (never saved, deleted, or
    /// expired).
    #[error("no session state found")]
    NotFound,

    /// The session state could not be serialized.
    #[error("error encoding session state: {0}")]
    Encode(#[source] BoxError),

    /// The stored bytes could not be turned back into the requested type.
    #[error("error decoding session state: {0}")]
    Decode(#[source] BoxError),

    /// Any other backend failure (connection lost, timeout, ...).
    #[error("session store backend error: {0}")]
    Backend(#[source] BoxError),
}
