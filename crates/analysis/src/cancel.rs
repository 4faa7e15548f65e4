//! Advisory cancellation for streaming evaluations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag handed to an evaluator alongside its request.
///
/// Cheap to clone; every clone observes the same flag. Stopping is advisory:
/// the evaluator is expected to poll [`StopSignal::is_stopped`] between
/// results and wind down on its own.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Fast atomic load, suitable for calling between every yielded result.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}
