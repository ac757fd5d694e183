use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::{Snapshot, Verdict};

/// Last known verdict per target, shared between the poller and its readers.
///
/// Clones share the same lock. Readers run concurrently; a writer holds the lock
/// for a whole polling cycle so no reader sees half of one.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    inner: Arc<RwLock<Snapshot>>, // empty until the first cycle completes
}

/// Exclusive access for one polling cycle. Dropping it publishes the cycle.
pub struct CycleWriter<'a> {
    guard: RwLockWriteGuard<'a, Snapshot>,
}

impl CycleWriter<'_> {
    pub fn record(&mut self, name: &str, verdict: Verdict) {
        match self.guard.get_mut(name) {
            Some(v) => *v = verdict,
            None => {
                self.guard.insert(name.to_owned(), verdict);
            }
        }
    }
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a single entry under its own exclusive lock.
    pub async fn write(&self, name: &str, verdict: Verdict) {
        self.begin_cycle().await.record(name, verdict);
    }

    pub async fn begin_cycle(&self) -> CycleWriter<'_> {
        CycleWriter {
            guard: self.inner.write().await,
        }
    }

    /// Shared guard for callers that render without copying.
    pub async fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner.read().await
    }

    pub async fn read_all(&self) -> Snapshot {
        self.inner.read().await.clone()
    }
}
