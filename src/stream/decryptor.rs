use std::io::{self, ErrorKind, Read, Write};

use anyhow::{Context, Result, ensure};
use tracing::{debug, warn};

use crate::cipher::cbc::malformed;
use crate::cipher::{CbcReader, ContentHasher, derive_key};
use crate::config::HASH_SIZE;
use crate::header::{Header, Preamble};
use crate::observer::Hooks;
use crate::secret::Password;
use crate::stream::{Settings, read_chunk};
use crate::types::DecryptionResult;

/// True when `err` means the container ran out or could not be decrypted,
/// as opposed to a failure of the underlying reader.
fn is_damage(err: &io::Error) -> bool {
    err.kind() == ErrorKind::UnexpectedEof || malformed(err).is_some()
}

/// Reads containers and classifies the outcome.
pub struct Decryptor {
    settings: Settings,
}

impl Decryptor {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Decrypts `reader` into `writer`.
    pub fn decrypt<R: Read, W: Write>(&self, reader: R, writer: W, password: &Password, hooks: Hooks<'_>) -> Result<DecryptionResult> {
        self.decrypt_into(reader, || Ok(writer), password, hooks)
    }

    /// Decrypts `reader` into the writer returned by `open_output`.
    ///
    /// `open_output` runs only once the magic tag has been validated, so a
    /// wrong password never creates or truncates the destination.
    ///
    /// Damage to the container is reported through the returned
    /// [`DecryptionResult`]. `Err` is reserved for I/O failures of the
    /// underlying reader or writer, an empty password, and
    /// [`crate::observer::Cancelled`].
    pub fn decrypt_into<R, W, F>(&self, mut reader: R, open_output: F, password: &Password, mut hooks: Hooks<'_>) -> Result<DecryptionResult>
    where
        R: Read,
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        ensure!(!password.is_empty(), "password cannot be empty");
        self.settings.validate()?;

        let header = match Header::read_from(&mut reader) {
            Ok(header) => header,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                debug!("input shorter than container header");
                return Ok(DecryptionResult::FailedFileCorrupted);
            }
            Err(e) => return Err(e).context("failed to read container header"),
        };

        let key = derive_key(password, header.salt(), self.settings.iterations)?;
        let mut cipher = CbcReader::new(reader, &key, header.iv());
        drop(key);

        let preamble = match Preamble::read_from(&mut cipher) {
            Ok(preamble) => preamble,
            Err(e) if is_damage(&e) => {
                debug!(error = %e, "preamble could not be decrypted");
                return Ok(DecryptionResult::FailedFileCorrupted);
            }
            Err(e) => return Err(e).context("failed to read preamble"),
        };

        if !preamble.has_valid_tag() {
            debug!("magic tag mismatch");
            return Ok(DecryptionResult::FailedFileCorrupted);
        }

        let Ok(declared) = u64::try_from(preamble.length()) else {
            warn!(length = preamble.length(), "negative plaintext length behind a valid tag");
            return Ok(DecryptionResult::FailedFileCorrupted);
        };

        let mut output = open_output()?;
        let mut hasher = ContentHasher::new();
        let mut buffer = vec![0u8; self.settings.chunk_size];

        if declared == 0 {
            hooks.report(0, 0);
        }

        while hasher.processed() < declared {
            hooks.checkpoint()?;

            let remaining = declared - hasher.processed();
            let want = usize::try_from(remaining).map_or(buffer.len(), |r| r.min(buffer.len()));

            let read = match read_chunk(&mut cipher, &mut buffer[..want]) {
                Ok(read) => read,
                Err(e) if is_damage(&e) => 0,
                Err(e) => return Err(e).context("failed to read ciphertext"),
            };

            if read == 0 {
                warn!(declared, recovered = hasher.processed(), "ciphertext ended before declared length");
                break;
            }

            let chunk = &buffer[..read];
            output.write_all(chunk).context("failed to write plaintext")?;
            hasher.update(chunk);

            hooks.report(declared, hasher.processed());
        }

        output.flush().context("failed to flush plaintext")?;
        drop(output);

        let mut stored = [0u8; HASH_SIZE];
        match cipher.read_exact(&mut stored) {
            Ok(()) => {}
            Err(e) if is_damage(&e) => {
                debug!(error = %e, "content hash missing or undecryptable");
                return Ok(DecryptionResult::FailedHashesDoNotMatch);
            }
            Err(e) => return Err(e).context("failed to read content hash"),
        }

        if !Self::trailer_is_clean(&mut cipher)? {
            debug!("unexpected data after content hash");
            return Ok(DecryptionResult::FailedHashesDoNotMatch);
        }

        let recovered = hasher.processed();
        if !hasher.finalize().matches(&stored) {
            debug!("content hash mismatch");
            return Ok(DecryptionResult::FailedHashesDoNotMatch);
        }

        if recovered != declared {
            warn!(declared, recovered, "recovered size does not match declared size");
            return Ok(DecryptionResult::FailedFileSizesDoNotMatch);
        }

        debug!(bytes = recovered, "decryption complete");
        Ok(DecryptionResult::Success)
    }

    /// Consumes the rest of the stream. Only padding may follow the hash,
    /// and the padding must be valid.
    fn trailer_is_clean<R: Read>(cipher: &mut CbcReader<R>) -> Result<bool> {
        let mut probe = [0u8; 1];
        match cipher.read(&mut probe) {
            Ok(0) => Ok(true),
            Ok(_) => Ok(false),
            Err(e) if is_damage(&e) => Ok(false),
            Err(e) => Err(e).context("failed to read container trailer"),
        }
    }
}
