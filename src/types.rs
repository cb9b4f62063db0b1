use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Progress callbacks invoked from the scanning code path.
///
/// Both methods are fire-and-forget and may be called at high frequency;
/// the caller is responsible for marshaling them to a UI thread.
pub trait ScanProgress {
    /// Report overall pipeline progress
    fn on_progress(&self, current: usize, total: usize, message: &str);
    /// Report file-index build progress for a search directory
    fn on_search_progress(&self, directory: &str, files_scanned: usize);
}

/// Cooperative cancellation signal for long-running operations.
///
/// Clones share the same underlying flag, so the caller keeps one handle
/// and passes another into the scan.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
