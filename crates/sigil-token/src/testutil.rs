//! Test helpers shared by this crate and its dependents.
//!
//! Enabled for this crate's own tests and, for other crates, through the
//! `testutil` feature (as a dev-dependency only).

use rand::{TryCryptoRng, TryRngCore};

/// Error reported by [`FailingRng`].
#[derive(Debug, thiserror::Error)]
#[error("entropy source exhausted")]
pub struct Exhausted;

/// A random source that never yields a single byte.
///
/// Stands in for an operating-system entropy pool that has failed, so
/// issuance failure paths can be exercised deterministically.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRng;

impl TryRngCore for FailingRng {
    type Error = Exhausted;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        Err(Exhausted)
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        Err(Exhausted)
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
        Err(Exhausted)
    }
}

impl TryCryptoRng for FailingRng {}
