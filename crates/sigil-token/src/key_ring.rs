//! A rotating set of signing keys.
//!
//! New tokens are signed with a key picked at random from the ring, and
//! incoming tokens are checked against every key in turn. That gives two
//! things:
//!
//! - An observer of issued tokens cannot tell which key is current, so a
//!   compromised key does not stand out.
//! - Keys can be phased in and out. Add the new key, wait for tokens
//!   signed with the old one to expire at the store, then drop the old key.

use rand::{Rng, TryCryptoRng};

use crate::{SigningKey, Token, TokenError, codec};

/// An ordered, non-empty collection of [`SigningKey`]s.
///
/// Immutable after construction, so a ring can be shared between threads
/// with no locking. Issuance picks keys with the calling thread's own
/// generator.
///
/// # Example
///
/// ```rust
/// use sigil_token::KeyRing;
///
/// let ring = KeyRing::new(["old-key", "new-key"]).unwrap();
/// let token = ring.issue(32, &mut rand::rng()).unwrap();
/// assert_eq!(ring.verify(&token.to_string()).unwrap(), token);
/// ```
#[derive(Debug, Clone)]
pub struct KeyRing {
    keys: Vec<SigningKey>,
}

impl KeyRing {
    /// Builds a ring from raw key material.
    ///
    /// # Errors
    /// - [`TokenError::EmptyKeyRing`] if `keys` yields nothing
    /// - [`TokenError::InvalidKey`] if any key is empty
    pub fn new<I, K>(keys: I) -> Result<Self, TokenError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Vec<u8>>,
    {
        let keys = keys
            .into_iter()
            .map(SigningKey::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_keys(keys)
    }

    /// Builds a ring from keys that are already validated.
    ///
    /// # Errors
    /// Returns [`TokenError::EmptyKeyRing`] if `keys` is empty.
    pub fn from_keys(keys: Vec<SigningKey>) -> Result<Self, TokenError> {
        if keys.is_empty() {
            return Err(TokenError::EmptyKeyRing);
        }
        tracing::debug!(keys = keys.len(), "key ring constructed");
        Ok(Self { keys })
    }

    /// A ring holding exactly one key.
    pub fn single(key: SigningKey) -> Self {
        Self { keys: vec![key] }
    }

    /// Number of keys in the ring. Never zero.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; a ring cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Picks a key for signing a new token, uniformly at random.
    pub fn select_for_issuance(&self) -> &SigningKey {
        let idx = rand::rng().random_range(0..self.keys.len());
        &self.keys[idx]
    }

    /// Issues a token signed with a randomly selected key.
    ///
    /// `rng` supplies the session ID bytes; key selection uses a separate
    /// thread-local generator.
    pub fn issue<R>(
        &self,
        id_length: usize,
        rng: &mut R,
    ) -> Result<Token, TokenError>
    where
        R: TryCryptoRng + ?Sized,
    {
        codec::issue(id_length, self.select_for_issuance(), rng)
    }

    /// Verifies a transport string against every key, in ring order.
    ///
    /// Returns the first successful verification. When every key fails,
    /// the error from the last key is returned; which keys were tried and
    /// why each one failed is not reported.
    pub fn verify(&self, token: &str) -> Result<Token, TokenError> {
        let mut last = TokenError::SignatureInvalid;
        for key in &self.keys {
            match codec::verify(token, key) {
                Ok(verified) => return Ok(verified),
                Err(e) => last = e,
            }
        }
        Err(last)
    }
}

// =========================================================================
// Tests
// =========================================================================
