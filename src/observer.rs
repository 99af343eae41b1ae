//! Progress reporting and cancellation for long-running calls.
//!
//! Both are optional. [`Hooks::default`] reports nothing and never cancels.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

/// Receives `(min, max, value)` after every processed chunk.
///
/// Called synchronously on the worker thread, so implementations should
/// return quickly. Any `FnMut(u64, u64, u64)` closure qualifies.
pub trait Progress {
    fn report(&mut self, min: u64, max: u64, value: u64);
}

impl<F> Progress for F
where
    F: FnMut(u64, u64, u64),
{
    fn report(&mut self, min: u64, max: u64, value: u64) {
        self(min, max, value);
    }
}

/// Error returned when a [`Cancellation`] token fires mid-operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Shared flag checked once per chunk.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Optional observers attached to a single encrypt or decrypt call.
#[derive(Default)]
pub struct Hooks<'a> {
    progress: Option<&'a mut dyn Progress>,
    cancellation: Option<&'a Cancellation>,
}

impl<'a> Hooks<'a> {
    pub fn with_progress(mut self, progress: &'a mut dyn Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancellation(mut self, cancellation: &'a Cancellation) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub(crate) fn report(&mut self, max: u64, value: u64) {
        if let Some(progress) = self.progress.as_deref_mut() {
            progress.report(0, max, value);
        }
    }

    /// Fails with [`Cancelled`] once the token has fired.
    pub(crate) fn checkpoint(&self) -> Result<()> {
        match self.cancellation {
            Some(token) if token.is_cancelled() => Err(Cancelled.into()),
            _ => Ok(()),
        }
    }
}
