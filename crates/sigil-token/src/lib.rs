//! Signed session tokens for Sigil.
//!
//! This crate defines the token that travels between client and server:
//!
//! - **Types** ([`Token`], [`SessionId`], [`SigningKey`]) — what a token
//!   is made of and which key signed it.
//! - **Codec** ([`codec::issue`], [`codec::verify`], [`codec::encode`]) —
//!   how a token is created, turned into a transport string, and checked.
//! - **Key ring** ([`KeyRing`]) — several signing keys at once, so keys can
//!   be rotated without invalidating tokens that are already out there.
//! - **Errors** ([`TokenError`]) — what can go wrong along the way.
//!
//! # Wire format
//!
//! ```text
//! base64url( ID bytes (>= 16) || HMAC-SHA256(ID, key) (32 bytes) )
//! ```
//!
//! The crate knows nothing about requests, stores, or session state. It
//! only knows how to mint and check tokens.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

pub mod codec;
mod error;
mod key_ring;
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
mod token;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::{DEFAULT_ID_LENGTH, MIN_ID_LENGTH, SIGNATURE_LENGTH};
pub use error::TokenError;
pub use key_ring::KeyRing;
pub use token::{SessionId, SigningKey, Token};
