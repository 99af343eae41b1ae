//! # Cryptographic building blocks
//!
//! - [`derive`]: PBKDF2-HMAC-SHA256 key derivation from password and salt
//! - [`random`]: the shared secure random source for IVs and salts
//! - [`cbc`]: AES-256-CBC `Read`/`Write` adapters with PKCS#7 padding
//! - [`hash`]: streaming SHA-256 over the plaintext
//!
//! Integrity comes from the embedded plaintext hash, not from an
//! authentication tag. Anyone able to rewrite both ciphertext and hash is
//! outside what this format defends against.

pub mod cbc;
pub mod derive;
pub mod hash;
pub mod random;

pub use cbc::{CbcReader, CbcWriter, MalformedCiphertext};
pub use derive::derive_key;
pub use hash::{ContentHash, ContentHasher};
pub use random::{OsRandom, RandomSource, SharedRandom};
