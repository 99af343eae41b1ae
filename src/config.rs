//! Global Configuration Constants
//!
//! Every fixed parameter of the container format and of the processing
//! loop lives here. Changing any of the format constants produces
//! containers that older builds cannot read.
//!
//! ## Container layout
//!
//! ```text
//! offset  size  field               encrypted
//! 0       16    IV                  no
//! 16      16    salt                no
//! 32      8     plaintext length    yes
//! 40      8     magic tag           yes
//! 48      len   plaintext           yes
//! 48+len  32    SHA-256(plaintext)  yes
//! ...     1-16  PKCS#7 padding      yes
//! ```

/// Application name used in user interfaces.
pub const APP_NAME: &str = "filecrypt-rs";

/// File extension appended to containers by the command line front end.
pub const FILE_EXTENSION: &str = ".fce";

// === Cipher Parameters ===

/// AES block size in bytes.
///
/// The chaining mode and the PKCS#7 padding both operate on this unit.
pub const BLOCK_SIZE: usize = 16;

/// Size of the derived AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the CBC initialization vector in bytes.
///
/// Always equal to [`BLOCK_SIZE`].
pub const IV_SIZE: usize = BLOCK_SIZE;

// === Key Derivation Parameters ===

/// Length of the per-container PBKDF2 salt in bytes.
pub const SALT_SIZE: usize = 16;

/// PBKDF2 iteration count.
///
/// The count is not stored in the container, so encrypt and decrypt must
/// agree on it out of band.
pub const PBKDF2_ITERATIONS: u32 = 1000;

// === Framing ===

/// Size of the unencrypted header (IV followed by salt).
pub const HEADER_SIZE: usize = IV_SIZE + SALT_SIZE;

/// Size of the encrypted preamble (plaintext length followed by magic tag).
pub const PREAMBLE_SIZE: usize = 16;

/// Constant embedded right after the plaintext length.
///
/// A wrong password or a foreign file decrypts this field to noise, which
/// lets decryption reject the input before touching the payload.
pub const MAGIC_TAG: u64 = 0xFC01_0203_0405_06CF;

/// Size of the trailing SHA-256 digest in bytes.
pub const HASH_SIZE: usize = 32;

// === Processing ===

/// Chunk size for streaming reads.
///
/// Peak buffer memory is roughly this size, and cancellation is checked once
/// per chunk, so it also bounds cancellation latency.
pub const CHUNK_SIZE: usize = 128 * 1024;

// === User Interface ===

/// Minimum length enforced when the command line prompts for a new password.
pub const PASSWORD_MIN_LENGTH: usize = 8;
