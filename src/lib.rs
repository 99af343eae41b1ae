//! filecrypt-rs - Streaming password-based file encryption.
//!
//! Files are sealed into a self-describing container:
//! - AES-256-CBC with PKCS7 padding over the whole payload
//! - PBKDF2-HMAC-SHA256 key derivation from a password and random salt
//! - A magic tag to reject wrong passwords early
//! - A SHA-256 digest of the plaintext to detect tampering and truncation
//!
//! [`Processor`] works on paths; [`Encryptor`] and [`Decryptor`] work on any
//! `Read`/`Write` pair.

pub mod cipher;
pub mod config;
pub mod file;
pub mod header;
pub mod observer;
pub mod padding;
pub mod processor;
pub mod secret;
pub mod stream;
pub mod types;

pub use cipher::{OsRandom, RandomSource, SharedRandom};
pub use observer::{Cancellation, Cancelled, Hooks, Progress};
pub use processor::Processor;
pub use secret::Password;
pub use stream::{Decryptor, Encryptor, Settings};
pub use types::DecryptionResult;
