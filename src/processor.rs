//! High-level file encryption and decryption operations.

use std::path::Path;

use anyhow::{Result, ensure};
use tracing::info;

use crate::cipher::SharedRandom;
use crate::file::File;
use crate::observer::Hooks;
use crate::secret::Password;
use crate::stream::{Decryptor, Encryptor, Settings};
use crate::types::DecryptionResult;

/// Encrypts and decrypts files by path.
///
/// Holds no per-call state. Wrap it in an `Arc` to share across threads.
pub struct Processor {
    random: SharedRandom,
    settings: Settings,
}

impl Processor {
    pub fn new(random: SharedRandom) -> Self {
        Self { random, settings: Settings::default() }
    }

    /// Overrides the streaming chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        ensure!(chunk_size > 0, "chunk size must be at least 1 byte");
        self.settings.chunk_size = chunk_size;
        Ok(self)
    }

    /// Overrides the PBKDF2 iteration count. Containers written with a
    /// non-default count can only be read back with the same count.
    pub fn with_iterations(mut self, iterations: u32) -> Result<Self> {
        ensure!(iterations > 0, "PBKDF2 iterations must be at least 1");
        self.settings.iterations = iterations;
        Ok(self)
    }

    /// Encrypts `input` into a new container at `output`.
    ///
    /// # Errors
    ///
    /// I/O failures, an empty password, identical input and output paths,
    /// an input that changes size while being read, and cancellation. A
    /// partially written `output` is left in place.
    pub fn encrypt(&self, input: &Path, output: &Path, password: &Password, hooks: Hooks<'_>) -> Result<()> {
        ensure!(input != output, "input and output must differ: {}", input.display());

        let source = File::new(input);
        let dest = File::new(output);

        let total = source.size()?;
        let reader = source.reader()?;
        let writer = dest.writer()?;

        info!(input = %input.display(), output = %output.display(), bytes = total, "encrypting");

        Encryptor::new(self.random.clone(), self.settings).encrypt(reader, writer, total, password, hooks)?;

        Ok(())
    }

    /// Decrypts the container at `input` into `output`.
    ///
    /// `output` is created only once the password has been accepted. On any
    /// result other than [`DecryptionResult::Success`] its content must not
    /// be trusted; it is not removed.
    ///
    /// # Errors
    ///
    /// I/O failures, an empty password, identical input and output paths
    /// and cancellation. Damaged containers are not errors.
    pub fn try_decrypt(&self, input: &Path, output: &Path, password: &Password, hooks: Hooks<'_>) -> Result<DecryptionResult> {
        ensure!(input != output, "input and output must differ: {}", input.display());

        let source = File::new(input);
        let dest = File::new(output);

        let reader = source.reader()?;

        info!(input = %input.display(), output = %output.display(), "decrypting");

        let result = Decryptor::new(self.settings).decrypt_into(reader, || dest.writer(), password, hooks)?;

        info!(%result, code = result.code(), "decryption finished");

        Ok(result)
    }
}
