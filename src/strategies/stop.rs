//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag that asks a running search to stop.
///
/// Cloning shares the flag: call [`stop`](StopHandle::stop) from any thread
/// and the search returns its best candidate at the next iteration boundary.
///
/// # Examples
///
/// ```
/// use u_tour::strategies::StopHandle;
///
/// let handle = StopHandle::new();
/// let remote = handle.clone();
/// remote.stop();
/// assert!(handle.is_stopped());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Creates a handle that is not stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the search to stop.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Clears the request so the handle can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_across_threads() {
        let handle = StopHandle::new();
        let remote = handle.clone();
        std::thread::spawn(move || remote.stop())
            .join()
            .expect("thread");
        assert!(handle.is_stopped());
        handle.reset();
        assert!(!handle.is_stopped());
    }
}
