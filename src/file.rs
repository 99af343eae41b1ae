//! Path handling for input and output files.
//!
//! [`File`] wraps a path with the few operations the processor and the
//! command line need: metadata, buffered handles, output naming and
//! removal of a failed output.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

use crate::config::FILE_EXTENSION;
use crate::types::ProcessorMode;

/// A file on disk, addressed by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Creates a handle without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.path.is_dir()
    }

    /// Size in bytes, read from metadata on every call.
    pub fn size(&self) -> Result<u64> {
        let meta = fs::metadata(&self.path).with_context(|| format!("failed to get metadata: {}", self.path.display()))?;
        Ok(meta.len())
    }

    /// Default destination for `mode`.
    ///
    /// Encryption appends the container extension. Decryption strips it and
    /// fails when it is missing, since the result would be the input itself.
    pub fn output_path(&self, mode: ProcessorMode) -> Result<PathBuf> {
        match mode {
            ProcessorMode::Encrypt => {
                let mut name = self.path.as_os_str().to_os_string();
                name.push(FILE_EXTENSION);
                Ok(PathBuf::from(name))
            }

            ProcessorMode::Decrypt => {
                let lossy = self.path.to_string_lossy();
                let stripped = lossy.strip_suffix(FILE_EXTENSION).filter(|s| !s.is_empty());
                stripped.map(PathBuf::from).with_context(|| format!("cannot derive output name, input lacks {FILE_EXTENSION}: {}", self.path.display()))
            }
        }
    }

    /// Checks that the path names an existing regular file.
    pub fn validate_input(&self) -> Result<()> {
        ensure!(self.exists(), "file not found: {}", self.path.display());
        ensure!(!self.is_dir(), "path is a directory: {}", self.path.display());
        Ok(())
    }

    /// Opens the file for buffered reading.
    pub fn reader(&self) -> Result<BufReader<fs::File>> {
        let file = fs::File::open(&self.path).with_context(|| format!("failed to open file: {}", self.path.display()))?;
        Ok(BufReader::new(file))
    }

    /// Creates or truncates the file for buffered writing, creating missing
    /// parent directories.
    pub fn writer(&self) -> Result<BufWriter<fs::File>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }

        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to create file: {}", self.path.display()))?;

        Ok(BufWriter::new(file))
    }

    pub fn delete(&self) -> Result<()> {
        ensure!(self.exists(), "file not found: {}", self.path.display());
        fs::remove_file(&self.path).with_context(|| format!("failed to delete file: {}", self.path.display()))
    }
}
