//! Error types for the token layer.
//!
//! Everything that can go wrong while minting or checking a token ends up
//! here. The session layer wraps these, so a caller looking at a
//! [`TokenError`] knows the problem is with the token itself, not with
//! the store or the request.

/// Errors that can occur while issuing or verifying a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// A signing key with no bytes was supplied.
    ///
    /// HMAC itself accepts a zero-length key; [`SigningKey`] does not.
    ///
    /// [`SigningKey`]: crate::SigningKey
    #[error("zero-length signing key")]
    InvalidKey,

    /// The requested session ID length is below the minimum.
    #[error("session ID length must be at least {min} bytes, got {actual}")]
    InvalidLength { min: usize, actual: usize },

    /// A key ring was built from an empty list of keys.
    #[error("key ring must contain at least one signing key")]
    EmptyKeyRing,

    /// The random source could not fill the session ID.
    ///
    /// The token is never produced from a partially filled buffer.
    #[error("error reading random bytes: {0}")]
    RandomSource(String),

    /// The token string is not valid URL-safe base64.
    #[error("error decoding the token: {0}")]
    Decoding(#[from] base64::DecodeError),

    /// The decoded token is too short to hold a minimum-length ID plus a
    /// signature.
    #[error("token not long enough: {len} bytes")]
    TooShort { len: usize },

    /// The signature does not match the ID under this key.
    ///
    /// Covers both tampering and a token signed with a different key.
    #[error("token signature is invalid")]
    SignatureInvalid,
}
