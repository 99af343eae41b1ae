//! Secure randomness for IVs and salts.
//!
//! The random source is a process-wide service: create one [`SharedRandom`]
//! at startup and hand clones of it to every [`crate::Processor`]. Every
//! implementation must be safe to call from several threads at once.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Source of cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    /// Fills `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

/// Handle to the process-wide random source.
pub type SharedRandom = Arc<dyn RandomSource>;

/// Operating system CSPRNG (`getrandom`).
///
/// Stateless, so concurrent use needs no locking.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandom;

impl OsRandom {
    /// Returns the OS generator as a shareable handle.
    pub fn shared() -> SharedRandom {
        Arc::new(Self)
    }
}

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|e| anyhow!("rng failed: {e}"))
    }
}

/// Fills a fixed-size array from `source`.
pub fn random_bytes<const N: usize>(source: &dyn RandomSource) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    source.fill(&mut bytes)?;
    Ok(bytes)
}
