use std::io::{Read, Write};

use anyhow::{Context, Result, ensure};
use tracing::debug;

use crate::cipher::{CbcWriter, ContentHasher, SharedRandom, derive_key};
use crate::header::{Header, Preamble};
use crate::observer::Hooks;
use crate::secret::Password;
use crate::stream::{Settings, read_chunk};

/// Writes containers.
pub struct Encryptor {
    random: SharedRandom,
    settings: Settings,
}

impl Encryptor {
    pub fn new(random: SharedRandom, settings: Settings) -> Self {
        Self { random, settings }
    }

    /// Encrypts everything `reader` yields into `writer` and returns the writer.
    ///
    /// `total_size` is stored as the plaintext length and must equal the
    /// number of bytes the reader produces; a mismatch is an error.
    ///
    /// # Errors
    ///
    /// Fails on an empty password, on any read or write error, when the
    /// random source fails, or with [`crate::observer::Cancelled`].
    pub fn encrypt<R: Read, W: Write>(&self, mut reader: R, mut writer: W, total_size: u64, password: &Password, mut hooks: Hooks<'_>) -> Result<W> {
        ensure!(!password.is_empty(), "password cannot be empty");
        self.settings.validate()?;
        let declared = i64::try_from(total_size).context("input too large for container")?;

        let header = Header::generate(self.random.as_ref())?;
        header.write_to(&mut writer).context("failed to write container header")?;

        let key = derive_key(password, header.salt(), self.settings.iterations)?;
        let mut cipher = CbcWriter::new(writer, &key, header.iv());
        drop(key);

        cipher.write_all(&Preamble::new(declared).to_bytes()).context("failed to write preamble")?;

        let mut hasher = ContentHasher::new();
        let mut buffer = vec![0u8; self.settings.chunk_size];
        let mut chunks = 0u64;

        loop {
            hooks.checkpoint()?;

            let read = read_chunk(&mut reader, &mut buffer).context("failed to read input")?;
            if read == 0 {
                break;
            }

            let chunk = &buffer[..read];
            cipher.write_all(chunk).context("failed to write ciphertext")?;
            hasher.update(chunk);
            chunks += 1;

            hooks.report(total_size, hasher.processed());
        }

        if chunks == 0 {
            hooks.report(total_size, 0);
        }

        ensure!(hasher.processed() == total_size, "input changed during encryption: expected {total_size} bytes, read {}", hasher.processed());

        let hash = hasher.finalize();
        cipher.write_all(hash.as_bytes()).context("failed to write content hash")?;
        let writer = cipher.finish().context("failed to finalize ciphertext")?;

        debug!(bytes = total_size, chunks, "encryption complete");

        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cipher::{OsRandom, RandomSource};
    use crate::header::container_len;
    use crate::stream::Decryptor;
    use crate::types::DecryptionResult;

    struct Fixed(u8);

    impl RandomSource for Fixed {
        fn fill(&self, dest: &mut [u8]) -> Result<()> {
            dest.fill(self.0);
            Ok(())
        }
    }

    fn encrypt_with(random: SharedRandom, data: &[u8], password: &str) -> Vec<u8> {
        Encryptor::new(random, Settings::default()).encrypt(data, Vec::new(), data.len() as u64, &Password::new(password), Hooks::default()).unwrap()
    }

    #[test]
    fn test_container_size() {
        for len in [0usize, 1, 15, 16, 17, 1000] {
            let data = vec![0xAB; len];
            let container = encrypt_with(OsRandom::shared(), &data, "pw");
            assert_eq!(container.len() as u64, container_len(len as u64));
        }
    }

    #[test]
    fn test_header_written_raw() {
        let container = encrypt_with(Arc::new(Fixed(0x5A)), b"payload", "pw");
        assert!(container[..32].iter().all(|&b| b == 0x5A));
    }

    #[test]
    fn test_fixed_randomness_is_deterministic() {
        let a = encrypt_with(Arc::new(Fixed(1)), b"same content", "pw");
        let b = encrypt_with(Arc::new(Fixed(1)), b"same content", "pw");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fresh_randomness_differs() {
        let a = encrypt_with(OsRandom::shared(), b"same content", "pw");
        let b = encrypt_with(OsRandom::shared(), b"same content", "pw");
        assert_ne!(a, b);

        for container in [&a, &b] {
            let mut out = Vec::new();
            let result = Decryptor::new(Settings::default()).decrypt(&container[..], &mut out, &Password::new("pw"), Hooks::default()).unwrap();
            assert_eq!(result, DecryptionResult::Success);
            assert_eq!(out, b"same content");
        }
    }

    #[test]
    fn test_empty_input_reports_progress() {
        let mut seen = Vec::new();
        let mut record = |min: u64, max: u64, value: u64| seen.push((min, max, value));
        Encryptor::new(OsRandom::shared(), Settings::default()).encrypt(&b""[..], Vec::new(), 0, &Password::new("hunter2"), Hooks::default().with_progress(&mut record)).unwrap();
        assert_eq!(seen, vec![(0, 0, 0)]);
    }

    #[test]
    fn test_size_mismatch_is_error() {
        let data = b"twelve bytes";
        let result = Encryptor::new(OsRandom::shared(), Settings::default()).encrypt(&data[..], Vec::new(), 20, &Password::new("pw"), Hooks::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_password_is_error() {
        let result = Encryptor::new(OsRandom::shared(), Settings::default()).encrypt(&b"data"[..], Vec::new(), 4, &Password::new(""), Hooks::default());
        assert!(result.is_err());
    }
}
