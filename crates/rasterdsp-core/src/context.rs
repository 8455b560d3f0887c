//! OperationContext - cooperative cancellation and progress reporting
//!
//! Long-running transforms take a context and poll it at the top of each
//! outer row or cell. Cancellation is cooperative: when the flag is set
//! the transform stops early and returns success with the partial result.
//! The caller owns the flag and can tell a partial result apart from a
//! complete one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Progress callback, called with a percentage in [0, 100].
pub type ProgressFn = dyn Fn(u8) + Send + Sync;

/// Cancellation flag plus optional progress sink for one or more
/// long-running transforms.
pub struct OperationContext {
    cancel: Arc<AtomicBool>,
    progress: Option<Box<ProgressFn>>,
}

impl OperationContext {
    /// Create a context with a fresh cancellation flag and no progress sink.
    pub fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, f: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Get a clone of the cancellation flag, e.g. to hand to a controller
    /// thread.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Context sharing this one's cancellation flag but without the
    /// progress sink. Composite transforms hand this to sub-operations
    /// whose progress they report themselves.
    pub fn child(&self) -> Self {
        Self {
            cancel: Arc::clone(&self.cancel),
            progress: None,
        }
    }

    /// Request cancellation of any transform polling this context.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Report progress as a percentage in [0, 100].
    #[inline]
    pub fn report_progress(&self, percent: u8) {
        if let Some(ref f) = self.progress {
            f(percent.min(100));
        }
    }

    /// Progress for row `y` of `height` rows, as the integer percentage
    /// `100 * y / height`.
    #[inline]
    pub fn report_row(&self, y: u32, height: u32) {
        if height > 0 {
            self.report_progress((100 * y / height) as u8);
        }
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationContext")
            .field("cancelled", &self.is_cancelled())
            .field("has_progress", &self.progress.is_some())
            .finish()
    }
}
