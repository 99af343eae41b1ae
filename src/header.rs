//! Container framing.
//!
//! A container is the raw [`Header`] (IV and salt) followed by one CBC
//! stream. Inside that stream the [`Preamble`] (declared plaintext length
//! and magic tag) comes first, then the plaintext, then its SHA-256 digest.
//! All integers are little-endian.

use std::io::{self, Read, Write};

use anyhow::Result;

use crate::cipher::RandomSource;
use crate::cipher::random::random_bytes;
use crate::config::{BLOCK_SIZE, HASH_SIZE, HEADER_SIZE, IV_SIZE, MAGIC_TAG, PREAMBLE_SIZE, SALT_SIZE};

/// The unencrypted start of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    iv: [u8; IV_SIZE],
    salt: [u8; SALT_SIZE],
}

impl Header {
    pub const fn new(iv: [u8; IV_SIZE], salt: [u8; SALT_SIZE]) -> Self {
        Self { iv, salt }
    }

    /// Draws a fresh IV and salt from `random`.
    pub fn generate(random: &dyn RandomSource) -> Result<Self> {
        Ok(Self { iv: random_bytes(random)?, salt: random_bytes(random)? })
    }

    #[inline]
    pub const fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }

    #[inline]
    pub const fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..IV_SIZE].copy_from_slice(&self.iv);
        out[IV_SIZE..].copy_from_slice(&self.salt);
        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Reads the header. A stream shorter than [`HEADER_SIZE`] fails with
    /// [`io::ErrorKind::UnexpectedEof`].
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut iv = [0u8; IV_SIZE];
        let mut salt = [0u8; SALT_SIZE];
        reader.read_exact(&mut iv)?;
        reader.read_exact(&mut salt)?;
        Ok(Self { iv, salt })
    }
}

/// The first encrypted fields of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preamble {
    length: i64,
    tag: u64,
}

impl Preamble {
    /// Preamble announcing `length` plaintext bytes, with the expected tag.
    pub const fn new(length: i64) -> Self {
        Self { length, tag: MAGIC_TAG }
    }

    /// Declared plaintext length as stored. May be negative in a damaged container.
    #[inline]
    pub const fn length(&self) -> i64 {
        self.length
    }

    #[inline]
    pub const fn has_valid_tag(&self) -> bool {
        self.tag == MAGIC_TAG
    }

    pub fn to_bytes(&self) -> [u8; PREAMBLE_SIZE] {
        let mut out = [0u8; PREAMBLE_SIZE];
        out[..8].copy_from_slice(&self.length.to_le_bytes());
        out[8..].copy_from_slice(&self.tag.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; PREAMBLE_SIZE]) -> Self {
        let mut length = [0u8; 8];
        let mut tag = [0u8; 8];
        length.copy_from_slice(&bytes[..8]);
        tag.copy_from_slice(&bytes[8..]);
        Self { length: i64::from_le_bytes(length), tag: u64::from_le_bytes(tag) }
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; PREAMBLE_SIZE];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_bytes(&bytes))
    }
}

/// Exact container size for a plaintext of `plaintext_len` bytes.
///
/// PKCS#7 always appends between one and sixteen bytes, so a protected
/// payload that is already block aligned gains a whole extra block.
pub const fn container_len(plaintext_len: u64) -> u64 {
    let protected = (PREAMBLE_SIZE + HASH_SIZE) as u64 + plaintext_len;
    let block = BLOCK_SIZE as u64;
    HEADER_SIZE as u64 + (protected / block + 1) * block
}
