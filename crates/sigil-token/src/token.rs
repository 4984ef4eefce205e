//! Core token types: the signed token, its ID, and the key that signs it.
//!
//! A [`Token`] is one contiguous buffer: the random session ID followed by
//! the HMAC-SHA256 signature of that ID. Keeping them together means the
//! wire format is a single opaque string with no delimiter to parse.
//!
//! None of these types print secret material through `Debug`, so they are
//! safe to drop into a `tracing` field or a panic message.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::TokenError;
use crate::codec::{self, SIGNATURE_LENGTH};

// ---------------------------------------------------------------------------
// SigningKey
// ---------------------------------------------------------------------------

/// A secret used to sign and verify session IDs.
///
/// The only rule is that a key must not be empty; any other length is
/// accepted by HMAC. Build one with [`SigningKey::new`] or `TryFrom`:
///
/// ```rust
/// use sigil_token::SigningKey;
///
/// let key = SigningKey::new("correct horse battery staple").unwrap();
/// assert!(SigningKey::new("").is_err());
/// # let _ = key;
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Creates a signing key from raw bytes.
    ///
    /// # Errors
    /// Returns [`TokenError::InvalidKey`] if `bytes` is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TokenError::InvalidKey);
        }
        Ok(Self(bytes))
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey(<{} bytes>)", self.0.len())
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = TokenError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl TryFrom<Vec<u8>> for SigningKey {
    type Error = TokenError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl TryFrom<&str> for SigningKey {
    type Error = TokenError;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

impl TryFrom<String> for SigningKey {
    type Error = TokenError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// The random ID portion of a [`Token`].
///
/// This is what a store uses as its lookup key. It borrows from the token
/// rather than copying, so it is cheap to pass around.
///
/// `Display` renders the ID as unpadded URL-safe base64, which is the
/// usual way to turn it into a string key:
///
/// ```rust
/// use sigil_token::{codec, SigningKey};
///
/// let key = SigningKey::new("secret").unwrap();
/// let token = codec::issue_default(&key).unwrap();
/// let store_key = format!("sid:{}", token.id());
/// assert!(store_key.len() > 4);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId<'a>(&'a [u8]);

impl<'a> SessionId<'a> {
    /// Returns the raw ID bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Number of bytes in the ID.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for IDs taken from a valid token.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SessionId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl fmt::Debug for SessionId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionId").field(&self.to_string()).finish()
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A crypto-random, digitally signed session token.
///
/// Created by [`codec::issue`] (or [`KeyRing::issue`](crate::KeyRing::issue))
/// and recovered from a transport string by [`codec::verify`]. A token is
/// immutable: there is no way to change its ID or signature after the fact.
///
/// `Display` produces the transport string. A verified token displays
/// byte-for-byte the same string it was verified from (modulo padding,
/// which the encoder never emits).
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    /// `id || signature`. Always at least `MIN_ID_LENGTH + SIGNATURE_LENGTH`
    /// bytes long.
    buf: Vec<u8>,
}

impl Token {
    /// Wraps a buffer the codec has already built or checked.
    pub(crate) fn from_buf(buf: Vec<u8>) -> Self {
        debug_assert!(buf.len() > SIGNATURE_LENGTH);
        Self { buf }
    }

    /// The full `id || signature` buffer, for the codec only.
    pub(crate) fn buf(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the session ID portion of the token.
    pub fn id(&self) -> SessionId<'_> {
        SessionId(&self.buf[..self.buf.len() - SIGNATURE_LENGTH])
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode(self))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("id_len", &self.id().len())
            .finish_non_exhaustive()
    }
}
