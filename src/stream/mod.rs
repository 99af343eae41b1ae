//! Chunked encryption and decryption over arbitrary `Read`/`Write` pairs.
//!
//! [`Encryptor`] and [`Decryptor`] hold no per-call state, so one instance
//! can serve any number of calls, including concurrent ones on different
//! threads.

use std::io::{self, ErrorKind, Read};

use anyhow::{Result, ensure};

use crate::config::{CHUNK_SIZE, PBKDF2_ITERATIONS};

pub mod decryptor;
pub mod encryptor;

pub use decryptor::Decryptor;
pub use encryptor::Encryptor;

/// Tunables shared by both directions.
///
/// Both sides of a container must use the same iteration count. Chunk size
/// only affects memory use, progress granularity and cancellation latency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub iterations: u32,
    pub chunk_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { iterations: PBKDF2_ITERATIONS, chunk_size: CHUNK_SIZE }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.iterations > 0, "PBKDF2 iterations must be at least 1");
        ensure!(self.chunk_size > 0, "chunk size must be at least 1 byte");
        Ok(())
    }
}

/// Reads until `buffer` is full or the reader is exhausted.
///
/// An error after some bytes were already read is deferred: the bytes are
/// returned and the reader is expected to report the error again on the next
/// call, which [`crate::cipher::CbcReader`] does.
pub(crate) fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(_) if filled > 0 => break,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Trickle<'a> {
        data: &'a [u8],
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.len().min(buf.len()).min(3);
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_read_chunk_fills_across_short_reads() {
        let data: Vec<u8> = (0..20).collect();
        let mut reader = Trickle { data: &data };
        let mut buffer = [0u8; 8];

        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 8);
        assert_eq!(buffer, [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 8);
        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 4);
        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_settings_validate() {
        assert!(Settings::default().validate().is_ok());
        assert!(Settings { iterations: 0, ..Settings::default() }.validate().is_err());
        assert!(Settings { chunk_size: 0, ..Settings::default() }.validate().is_err());
    }
}
