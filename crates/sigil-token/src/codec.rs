//! Issuing, encoding, and verifying tokens.
//!
//! Three free functions make up the codec:
//!
//! - [`issue`] draws a random ID and signs it.
//! - [`encode`] turns a token into its transport string.
//! - [`verify`] turns a transport string back into a token, but only if
//!   the signature checks out under the given key.
//!
//! All three are pure over their inputs. The random source is a parameter
//! rather than a global, so tests can hand in a source that fails on
//! purpose and production code hands in the operating system's.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::{TryCryptoRng, TryRngCore};
use sha2::Sha256;

use crate::{SigningKey, Token, TokenError};

type HmacSha256 = Hmac<Sha256>;

/// Minimum session ID length in bytes.
///
/// See <https://owasp.org/www-community/vulnerabilities/Insufficient_Session-ID_Length>.
pub const MIN_ID_LENGTH: usize = 16;

/// Session ID length used when none is configured.
pub const DEFAULT_ID_LENGTH: usize = 32;

/// Length of the HMAC-SHA256 signature appended to every ID.
pub const SIGNATURE_LENGTH: usize = 32;

/// URL-safe alphabet. Emits no padding, accepts input with or without it.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Issues a new token with an ID of `id_length` random bytes.
///
/// The ID is read from `rng` in one call and signed with `key`. The
/// returned token holds `id || HMAC-SHA256(id, key)`.
///
/// # Errors
/// - [`TokenError::InvalidLength`] if `id_length` is below [`MIN_ID_LENGTH`]
/// - [`TokenError::RandomSource`] if `rng` cannot fill the ID
///
/// # Example
///
/// ```rust
/// use sigil_token::{codec, SigningKey};
///
/// let key = SigningKey::new("secret").unwrap();
/// let token = codec::issue(16, &key, &mut rand::rng()).unwrap();
/// assert_eq!(token.id().len(), 16);
///
/// let verified = codec::verify(&token.to_string(), &key).unwrap();
/// assert_eq!(verified, token);
/// ```
pub fn issue<R>(
    id_length: usize,
    key: &SigningKey,
    rng: &mut R,
) -> Result<Token, TokenError>
where
    R: TryCryptoRng + ?Sized,
{
    if id_length < MIN_ID_LENGTH {
        return Err(TokenError::InvalidLength {
            min: MIN_ID_LENGTH,
            actual: id_length,
        });
    }

    // Room for the signature up front so appending it never reallocates.
    let mut buf = Vec::with_capacity(id_length + SIGNATURE_LENGTH);
    buf.resize(id_length, 0);
    rng.try_fill_bytes(&mut buf)
        .map_err(|e| TokenError::RandomSource(e.to_string()))?;

    let mut mac = mac_for(key)?;
    mac.update(&buf);
    buf.extend_from_slice(&mac.finalize().into_bytes());

    Ok(Token::from_buf(buf))
}

/// Issues a token of [`DEFAULT_ID_LENGTH`] using the operating system's
/// random source.
pub fn issue_default(key: &SigningKey) -> Result<Token, TokenError> {
    issue(DEFAULT_ID_LENGTH, key, &mut OsRng)
}

/// Verifies a transport string against a single key.
///
/// # Errors
/// - [`TokenError::Decoding`] if `token` is not URL-safe base64
/// - [`TokenError::TooShort`] if the decoded buffer cannot hold a
///   minimum-length ID and a signature
/// - [`TokenError::SignatureInvalid`] if the signature does not match,
///   whether because the token was modified or signed with another key
pub fn verify(token: &str, key: &SigningKey) -> Result<Token, TokenError> {
    let buf = TOKEN_ENGINE.decode(token)?;
    if buf.len() < MIN_ID_LENGTH + SIGNATURE_LENGTH {
        return Err(TokenError::TooShort { len: buf.len() });
    }

    let (id, signature) = buf.split_at(buf.len() - SIGNATURE_LENGTH);
    let mut mac = mac_for(key)?;
    mac.update(id);
    // `verify_slice` compares in constant time.
    mac.verify_slice(signature)
        .map_err(|_| TokenError::SignatureInvalid)?;

    Ok(Token::from_buf(buf))
}

/// Encodes a token as unpadded URL-safe base64.
pub fn encode(token: &Token) -> String {
    TOKEN_ENGINE.encode(token.buf())
}

fn mac_for(key: &SigningKey) -> Result<HmacSha256, TokenError> {
    HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| TokenError::InvalidKey)
}

// =========================================================================
// Tests
// =========================================================================
