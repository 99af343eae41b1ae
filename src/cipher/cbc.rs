//! AES-256-CBC stream adapters.
//!
//! [`CbcWriter`] encrypts everything written through it and [`CbcReader`]
//! decrypts everything read through it. Both pad with PKCS#7 on the AES
//! block, so the ciphertext is always one to sixteen bytes longer than the
//! plaintext.
//!
//! The writer only emits its final, padded block from [`CbcWriter::finish`].
//! Dropping it early releases the inner writer without that block, which
//! leaves an unreadable stream behind.

use std::error::Error;
use std::fmt;
use std::io::{self, ErrorKind, Read, Write};

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block};

use crate::config::{BLOCK_SIZE, CHUNK_SIZE, IV_SIZE};
use crate::padding::Pkcs7Padding;
use crate::secret::SecretKey;

/// Ciphertext that cannot be decrypted into a well-formed stream.
///
/// Carried inside an [`io::Error`] of kind [`ErrorKind::InvalidData`] so the
/// adapters stay plain [`Read`] implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedCiphertext {
    /// The stream carried no ciphertext block at all.
    Empty,
    /// The stream ended in the middle of a block.
    Misaligned,
    /// The final block did not carry valid PKCS#7 padding.
    BadPadding,
}

impl fmt::Display for MalformedCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "ciphertext is empty",
            Self::Misaligned => "ciphertext is not a whole number of blocks",
            Self::BadPadding => "ciphertext has invalid padding",
        })
    }
}

impl Error for MalformedCiphertext {}

impl From<MalformedCiphertext> for io::Error {
    fn from(err: MalformedCiphertext) -> Self {
        io::Error::new(ErrorKind::InvalidData, err)
    }
}

/// Returns the ciphertext defect wrapped in `err`, if that is what it carries.
pub fn malformed(err: &io::Error) -> Option<MalformedCiphertext> {
    err.get_ref().and_then(|inner| inner.downcast_ref::<MalformedCiphertext>()).copied()
}

#[inline]
fn xor_in_place(block: &mut [u8], other: &[u8; BLOCK_SIZE]) {
    block.iter_mut().zip(other).for_each(|(a, b)| *a ^= b);
}

/// Encrypting [`Write`] adapter.
pub struct CbcWriter<W: Write> {
    inner: W,
    cipher: Aes256Enc,
    prev: [u8; BLOCK_SIZE],
    pending: Vec<u8>,
    out: Vec<u8>,
}

impl<W: Write> CbcWriter<W> {
    pub fn new(inner: W, key: &SecretKey, iv: &[u8; IV_SIZE]) -> Self {
        Self { inner, cipher: Aes256Enc::new(key.expose_secret().into()), prev: *iv, pending: Vec::with_capacity(BLOCK_SIZE), out: Vec::new() }
    }

    fn encrypt_block(&mut self, plain: &[u8]) {
        let mut block = Block::clone_from_slice(plain);
        xor_in_place(&mut block, &self.prev);
        self.cipher.encrypt_block(&mut block);
        self.prev.copy_from_slice(&block);
        self.out.extend_from_slice(&block);
    }

    /// Pads and encrypts the buffered tail, flushes, and hands back the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        let tail = Pkcs7Padding::pad_tail(&self.pending).map_err(io::Error::other)?;
        self.pending.clear();
        self.out.clear();
        self.encrypt_block(&tail);
        self.inner.write_all(&self.out)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for CbcWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.clear();
        let mut rest = buf;

        if !self.pending.is_empty() {
            let take = rest.len().min(BLOCK_SIZE - self.pending.len());
            self.pending.extend_from_slice(&rest[..take]);
            rest = &rest[take..];

            if self.pending.len() == BLOCK_SIZE {
                let mut block = [0u8; BLOCK_SIZE];
                block.copy_from_slice(&self.pending);
                self.pending.clear();
                self.encrypt_block(&block);
            }
        }

        let mut blocks = rest.chunks_exact(BLOCK_SIZE);
        for block in blocks.by_ref() {
            self.encrypt_block(block);
        }
        self.pending.extend_from_slice(blocks.remainder());

        if !self.out.is_empty() {
            self.inner.write_all(&self.out)?;
        }

        Ok(buf.len())
    }

    /// Flushes the inner writer. Buffered plaintext below one block stays
    /// buffered until [`CbcWriter::finish`].
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Decrypting [`Read`] adapter.
///
/// The most recent decrypted block is held back until the inner reader hits
/// end of stream, since only then is it known to be the padded final block.
pub struct CbcReader<R: Read> {
    inner: R,
    cipher: Aes256Dec,
    prev: [u8; BLOCK_SIZE],
    held: Option<[u8; BLOCK_SIZE]>,
    seen_block: bool,
    pending: Vec<u8>,
    scratch: Vec<u8>,
    ready: Vec<u8>,
    ready_pos: usize,
    done: bool,
    failure: Option<MalformedCiphertext>,
}

impl<R: Read> CbcReader<R> {
    pub fn new(inner: R, key: &SecretKey, iv: &[u8; IV_SIZE]) -> Self {
        Self {
            inner,
            cipher: Aes256Dec::new(key.expose_secret().into()),
            prev: *iv,
            held: None,
            seen_block: false,
            pending: Vec::with_capacity(BLOCK_SIZE),
            scratch: vec![0u8; CHUNK_SIZE],
            ready: Vec::new(),
            ready_pos: 0,
            done: false,
            failure: None,
        }
    }

    fn fail(&mut self, defect: MalformedCiphertext) -> io::Error {
        self.done = true;
        self.failure = Some(defect);
        defect.into()
    }

    fn decrypt_pending(&mut self) {
        let whole = self.pending.len() - self.pending.len() % BLOCK_SIZE;
        for chunk in self.pending[..whole].chunks_exact(BLOCK_SIZE) {
            let mut block = Block::clone_from_slice(chunk);
            self.cipher.decrypt_block(&mut block);

            let mut plain = [0u8; BLOCK_SIZE];
            plain.copy_from_slice(&block);
            xor_in_place(&mut plain, &self.prev);
            self.prev.copy_from_slice(chunk);

            if let Some(released) = self.held.replace(plain) {
                self.ready.extend_from_slice(&released);
            }
            self.seen_block = true;
        }
        self.pending.drain(..whole);
    }

    fn finish_stream(&mut self) -> io::Result<()> {
        self.done = true;
        if !self.pending.is_empty() {
            return Err(self.fail(MalformedCiphertext::Misaligned));
        }
        if !self.seen_block {
            return Err(self.fail(MalformedCiphertext::Empty));
        }
        if let Some(last) = self.held.take() {
            match Pkcs7Padding::unpad_block(&last) {
                Ok(tail) => self.ready.extend_from_slice(&tail),
                Err(_) => return Err(self.fail(MalformedCiphertext::BadPadding)),
            }
        }
        Ok(())
    }

    /// Refills `ready` with the next plaintext, or leaves it empty at end of stream.
    fn fill(&mut self) -> io::Result<()> {
        self.ready.clear();
        self.ready_pos = 0;

        while self.ready.is_empty() && !self.done {
            let n = match self.inner.read(&mut self.scratch) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if n == 0 {
                self.finish_stream()?;
            } else {
                self.pending.extend_from_slice(&self.scratch[..n]);
                self.decrypt_pending();
            }
        }

        Ok(())
    }
}

impl<R: Read> Read for CbcReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.ready_pos >= self.ready.len() {
            if let Some(defect) = self.failure {
                return Err(defect.into());
            }
            self.fill()?;
        }

        let available = &self.ready[self.ready_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.ready_pos += n;

        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KEY_SIZE;

    fn key() -> SecretKey {
        SecretKey::from_array([0x42; KEY_SIZE])
    }

    const IV: [u8; IV_SIZE] = [0x24; IV_SIZE];

    fn encrypt(plaintext: &[u8], write_size: usize) -> Vec<u8> {
        let mut writer = CbcWriter::new(Vec::new(), &key(), &IV);
        for piece in plaintext.chunks(write_size.max(1)) {
            writer.write_all(piece).unwrap();
        }
        writer.finish().unwrap()
    }

    fn decrypt(ciphertext: &[u8]) -> io::Result<Vec<u8>> {
        let mut reader = CbcReader::new(ciphertext, &key(), &IV);
        let mut out = Vec::new();
        reader.read_to_end(&mut out)?;
        Ok(out)
    }

    #[test]
    fn test_ciphertext_length_is_padded() {
        for len in [0usize, 1, 15, 16, 17, 31, 32, 100] {
            let ciphertext = encrypt(&vec![7u8; len], 5);
            assert_eq!(ciphertext.len(), (len / BLOCK_SIZE + 1) * BLOCK_SIZE);
        }
    }

    #[test]
    fn test_roundtrip_with_uneven_writes() {
        let plaintext: Vec<u8> = (0..1000u32).map(|i| (i * 7 % 256) as u8).collect();
        for write_size in [1, 3, 16, 17, 999, 4096] {
            let ciphertext = encrypt(&plaintext, write_size);
            assert_eq!(decrypt(&ciphertext).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_write_pattern_does_not_change_ciphertext() {
        let plaintext = vec![9u8; 333];
        assert_eq!(encrypt(&plaintext, 1), encrypt(&plaintext, 333));
    }

    #[test]
    fn test_matches_nist_cbc_vector() {
        // NIST SP 800-38A, F.2.5 CBC-AES256.Encrypt, first block.
        let key = SecretKey::from_array([
            0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d, 0x77, 0x81, 0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10,
            0xa3, 0x09, 0x14, 0xdf, 0xf4,
        ]);
        let iv = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f];
        let plain = [0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17, 0x2a];
        let expected = [0xf5, 0x8c, 0x4c, 0x04, 0xd6, 0xe5, 0xf1, 0xba, 0x77, 0x9e, 0xab, 0xfb, 0x5f, 0x7b, 0xfb, 0xd6];

        let mut writer = CbcWriter::new(Vec::new(), &key, &iv);
        writer.write_all(&plain).unwrap();
        let ciphertext = writer.finish().unwrap();

        assert_eq!(&ciphertext[..BLOCK_SIZE], &expected);
    }

    #[test]
    fn test_empty_ciphertext_is_malformed() {
        let err = decrypt(&[]).unwrap_err();
        assert_eq!(malformed(&err), Some(MalformedCiphertext::Empty));
    }

    #[test]
    fn test_truncated_block_is_malformed() {
        let ciphertext = encrypt(b"some plaintext that spans blocks", 8);
        let err = decrypt(&ciphertext[..ciphertext.len() - 3]).unwrap_err();
        assert_eq!(malformed(&err), Some(MalformedCiphertext::Misaligned));
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_wrong_key_is_rejected_or_garbled() {
        let plaintext = b"attack at dawn".to_vec();
        let ciphertext = encrypt(&plaintext, 4);

        let mut reader = CbcReader::new(&ciphertext[..], &SecretKey::from_array([0x43; KEY_SIZE]), &IV);
        let mut out = Vec::new();
        match reader.read_to_end(&mut out) {
            Ok(_) => assert_ne!(out, plaintext),
            Err(err) => assert_eq!(malformed(&err), Some(MalformedCiphertext::BadPadding)),
        }
    }

    #[test]
    fn test_failure_is_sticky() {
        let mut reader = CbcReader::new(&[1u8, 2, 3][..], &key(), &IV);
        let mut buf = [0u8; 8];
        assert!(reader.read(&mut buf).is_err());
        assert!(reader.read(&mut buf).is_err());
    }
}
