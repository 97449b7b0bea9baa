//! Batch outcome types, execution options, and cancellation.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::core::{AnalysisResult, Error};

/// Cooperative cancellation flag for a batch run.
///
/// Cloning yields a handle to the same flag, so a caller can keep one clone
/// and hand another to the batch. Once cancelled, no new per-file analysis is
/// started; analyses already in flight run to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Options for [`analyze_files_bounded`].
///
/// [`analyze_files_bounded`]: super::AnalysisCoordinator::analyze_files_bounded
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker threads. `0` means one per available CPU.
    pub workers: usize,
    /// Cancellation handle observed between per-file analyses.
    pub cancel: CancelToken,
}

impl BatchOptions {
    /// Options with default fan-out and a fresh cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive options from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            workers: config.batch.workers,
            cancel: CancelToken::new(),
        }
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Use an externally held cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Resolve `workers == 0` to the available parallelism.
    pub(crate) fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

/// An analyzer failure for one routed file.
///
/// Only produced for files the coordinator actually routed to an analyzer;
/// unroutable files are omitted from the report entirely.
#[derive(Debug)]
pub struct FileFailure {
    /// Path of the file whose analysis failed.
    pub path: PathBuf,
    /// The analyzer's error, unmodified.
    pub error: Error,
}

/// Aggregated outcome of a batch run.
///
/// `results` holds the successful per-file results in the relative order of
/// the input paths; `failures` likewise preserves input order. Files no
/// analyzer claimed appear in neither list. Partial success is always
/// explicit: a wrapper can report per-file status instead of one opaque
/// batch failure.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful results, in input order.
    pub results: Vec<AnalysisResult>,
    /// Per-file analyzer failures, in input order.
    pub failures: Vec<FileFailure>,
    /// Whether the batch was cancelled before every path was attempted.
    /// When true, `results` and `failures` cover only the attempted prefix
    /// of the input.
    pub cancelled: bool,
}

impl BatchReport {
    /// Whether every routed file succeeded and the batch ran to completion.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    /// Number of files that produced a result.
    pub fn analyzed(&self) -> usize {
        self.results.len()
    }

    /// Number of routed files whose analysis failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
