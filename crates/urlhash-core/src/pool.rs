//! Fixed-size worker pool between the task queue and the outcome queue.
//!
//! Workers are scoped OS threads. Each one opens a fetch session, then loops
//! pulling tasks until the task queue is drained and closed. Workers hold the
//! only senders of the outcome queue, so once [`WorkerPool::join`] returns the
//! consumer's receive loop ends on its own.

use crate::fetch::{FetchSession, Fetcher};
use crate::task::{Outcome, Task, UrlDigest, UrlFailure};
use std::io;
use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, Scope, ScopedJoinHandle};

/// Multi-consumer handle on the task channel.
///
/// `std::sync::mpsc` receivers are single-consumer, so workers take turns on
/// the receiver. A worker blocked in `next` holds the lock; the others wait on
/// the lock instead of the channel.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    rx: Arc<Mutex<Receiver<Task>>>,
}

impl TaskQueue {
    pub fn new(rx: Receiver<Task>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Blocks for the next task. `None` once every sender is gone and the
    /// channel is empty.
    pub fn next(&self) -> Option<Task> {
        let rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
        rx.recv().ok()
    }
}

/// Counts reported by one worker when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub hashed: u64,
    pub failed: u64,
}

/// Totals over all workers of a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub workers: usize,
    pub hashed: u64,
    pub failed: u64,
    /// Workers that panicked; their counts are lost.
    pub panicked: usize,
}

/// Running workers of one pipeline run.
pub struct WorkerPool<'scope> {
    handles: Vec<ScopedJoinHandle<'scope, WorkerStats>>,
}

impl<'scope> WorkerPool<'scope> {
    /// Spawns exactly `size` workers on `scope`.
    ///
    /// `outcomes` is cloned into every worker and the passed-in sender dropped, so the
    /// outcome channel closes when the last worker exits. If a spawn fails the
    /// workers already started stay in the scope and exit once the task queue
    /// closes.
    pub fn spawn<'env, F: Fetcher>(
        scope: &'scope Scope<'scope, 'env>,
        size: usize,
        fetcher: &'env F,
        tasks: TaskQueue,
        outcomes: SyncSender<Outcome>,
    ) -> io::Result<Self> {
        let mut handles = Vec::with_capacity(size);
        for id in 0..size {
            let tasks = tasks.clone();
            let outcomes = outcomes.clone();
            let handle = thread::Builder::new()
                .name(format!("urlhash-worker-{}", id))
                .spawn_scoped(scope, move || run_worker(id, fetcher, &tasks, &outcomes))?;
            handles.push(handle);
        }
        tracing::debug!(workers = size, "worker pool started");
        Ok(Self { handles })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker to exit.
    pub fn join(self) -> PoolStats {
        let mut stats = PoolStats {
            workers: self.handles.len(),
            ..PoolStats::default()
        };
        for handle in self.handles {
            match handle.join() {
                Ok(w) => {
                    stats.hashed += w.hashed;
                    stats.failed += w.failed;
                }
                Err(_) => {
                    stats.panicked += 1;
                    tracing::error!("worker thread panicked");
                }
            }
        }
        tracing::debug!(?stats, "worker pool finished");
        stats
    }
}

fn run_worker<F: Fetcher>(
    id: usize,
    fetcher: &F,
    tasks: &TaskQueue,
    outcomes: &SyncSender<Outcome>,
) -> WorkerStats {
    let mut session = fetcher.session();
    let mut stats = WorkerStats::default();

    while let Some(task) = tasks.next() {
        let url = task.into_url();
        let outcome = match session.fetch_and_hash(&url) {
            Ok(digest) => {
                stats.hashed += 1;
                Outcome::Hashed(UrlDigest { url, digest })
            }
            Err(error) => {
                stats.failed += 1;
                tracing::debug!(worker = id, url = %url, error = %error, "fetch failed");
                Outcome::Failed(UrlFailure { url, error })
            }
        };
        if outcomes.send(outcome).is_err() {
            tracing::warn!(worker = id, "outcome queue closed; worker stopping");
            break;
        }
    }

    stats
}
