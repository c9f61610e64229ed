use std::{
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::warn;

/// Background work (timers, like requests) spawned by the page behaviors.
pub(crate) struct TaskSet {
    runtime: Handle,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskSet {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = self.runtime.spawn(task);
        let mut pending = self.pending();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Waits for every task, including ones spawned while waiting.
    pub(crate) async fn settle(&self) {
        loop {
            let batch = std::mem::take(&mut *self.pending());
            if batch.is_empty() {
                return;
            }
            for handle in batch {
                if let Err(error) = handle.await {
                    warn!(%error, "page task ended abnormally");
                }
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        let mut pending = self.pending();
        pending.retain(|h| !h.is_finished());
        pending.len()
    }
}
