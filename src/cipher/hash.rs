//! Content integrity hashing with SHA-256.
//!
//! The digest covers the plaintext bytes only. It is fed chunk by chunk while
//! the payload streams through the cipher, so the whole file never has to be
//! in memory.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::HASH_SIZE;

/// Running SHA-256 over the plaintext, with a byte counter.
#[derive(Clone, Default)]
pub struct ContentHasher {
    hasher: Sha256,
    processed: u64,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.processed += data.len() as u64;
    }

    /// Number of bytes hashed so far.
    #[inline]
    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn finalize(self) -> ContentHash {
        ContentHash { hash: self.hasher.finalize().into() }
    }
}

/// A finished SHA-256 digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHash {
    hash: [u8; HASH_SIZE],
}

impl ContentHash {
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        let mut hasher = ContentHasher::new();
        hasher.update(data);
        hasher.finalize()
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.hash
    }

    /// Constant-time comparison against a stored digest.
    #[must_use]
    pub fn matches(&self, expected: &[u8; HASH_SIZE]) -> bool {
        bool::from(self.hash.as_slice().ct_eq(expected.as_slice()))
    }
}
