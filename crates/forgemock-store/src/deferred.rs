//! Deferred mutation scheduler.
//!
//! The one place the mock mutates state outside a request cycle is the
//! extension self-heal (see the extension handler). Rather than an
//! unmanaged timer, deferred actions run through this scheduler so that
//! shutdown can abort anything still pending - a torn-down store must
//! never be mutated by a stray timer.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Tracks fire-and-forget deferred actions.
///
/// Actions are spawned onto the ambient tokio runtime; [`clear`] aborts
/// everything still pending and is also invoked on drop.
///
/// [`clear`]: DeferredTasks::clear
#[derive(Debug, Default)]
pub struct DeferredTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl DeferredTasks {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        self.lock().push(handle);
    }

    /// Number of actions not yet completed.
    #[must_use]
    pub fn pending(&self) -> usize {
        let mut handles = self.lock();
        handles.retain(|h| !h.is_finished());
        handles.len()
    }

    /// Abort every pending action.
    pub fn clear(&self) {
        let handles: Vec<JoinHandle<()>> = self.lock().drain(..).collect();
        if !handles.is_empty() {
            debug!(count = handles.len(), "aborting pending deferred actions");
        }
        for handle in handles {
            handle.abort();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DeferredTasks {
    fn drop(&mut self) {
        self.clear();
    }
}
