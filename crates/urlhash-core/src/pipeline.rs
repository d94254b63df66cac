//! Pipeline driver: producer -> worker pool -> consumer.
//!
//! The producer normalizes URLs onto a rendezvous task channel, `parallel`
//! workers fetch and hash, and one consumer drains outcomes into a
//! [`ResultSink`]. Shutdown is ordered: the producer finishes and closes the
//! task queue, the pool drains it and exits (closing the outcome queue), and
//! only then can the consumer's receive loop end. Individual fetch failures
//! never stop a run.

use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use crate::config::UrlhashConfig;
use crate::fetch::{Fetcher, HttpClient};
use crate::pool::{PoolStats, TaskQueue, WorkerPool};
use crate::sink::{CollectSink, LineSink, ResultSink};

pub use crate::task::{Outcome, Task, UrlDigest, UrlFailure};

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    /// Producer enqueuing, workers fetching.
    Producing,
    /// Input exhausted; waiting for workers and the consumer to finish.
    Draining,
    Done,
}

/// Counts for one finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tasks the producer enqueued.
    pub submitted: u64,
    /// Outcomes the worker pool produced.
    pub pool: PoolStats,
    /// Outcomes the consumer drained into the sink.
    pub drained: u64,
    /// Outcomes the sink failed to accept (e.g. broken stdout).
    pub sink_errors: u64,
}

impl RunSummary {
    pub fn hashed(&self) -> u64 {
        self.pool.hashed
    }

    pub fn failed(&self) -> u64 {
        self.pool.failed
    }
}

/// Three-stage fetch-and-hash pipeline with a fixed worker count.
#[derive(Debug)]
pub struct Pipeline<F> {
    parallel: usize,
    fetcher: F,
}

impl Pipeline<HttpClient> {
    /// Pipeline over the curl client, configured from `cfg`.
    pub fn from_config(cfg: &UrlhashConfig) -> Result<Self> {
        Self::new(cfg.parallel, HttpClient::new(cfg.http.clone()))
    }
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(parallel: usize, fetcher: F) -> Result<Self> {
        if parallel == 0 {
            anyhow::bail!("parallel must be at least 1");
        }
        Ok(Self { parallel, fetcher })
    }

    pub fn parallel(&self) -> usize {
        self.parallel
    }

    /// Fetch and hash every URL in `urls`, handing each outcome to `sink` as
    /// it arrives. Blocks until every stage has finished.
    pub fn run<I, S>(&self, urls: I, sink: &mut S) -> Result<RunSummary>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
        S: ResultSink,
    {
        let urls = urls.into_iter();
        let mut stage = Stage::Idle;
        tracing::debug!(?stage, workers = self.parallel, "pipeline starting");

        let (task_tx, task_rx) = mpsc::sync_channel::<Task>(0);
        let (outcome_tx, outcome_rx) = mpsc::sync_channel::<Outcome>(0);

        let summary = thread::scope(|s| -> Result<RunSummary> {
            // On spawn failure `task_tx` is dropped on return, which lets any
            // workers already started see a closed queue and exit.
            let pool = WorkerPool::spawn(
                s,
                self.parallel,
                &self.fetcher,
                TaskQueue::new(task_rx),
                outcome_tx,
            )
            .context("spawn worker pool")?;

            let consumer = thread::Builder::new()
                .name("urlhash-consumer".to_string())
                .spawn_scoped(s, move || drain(outcome_rx, sink))
                .context("spawn consumer thread")?;

            let producer = thread::Builder::new()
                .name("urlhash-producer".to_string())
                .spawn_scoped(s, move || produce(urls, task_tx))
                .context("spawn producer thread")?;

            stage = Stage::Producing;
            tracing::debug!(?stage, "pipeline running");

            let submitted = producer
                .join()
                .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;
            stage = Stage::Draining;
            tracing::debug!(?stage, submitted, "input queue closed");

            let pool = pool.join();
            let (drained, sink_errors) = consumer
                .join()
                .map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;

            Ok(RunSummary {
                submitted,
                pool,
                drained,
                sink_errors,
            })
        })?;

        stage = Stage::Done;
        tracing::info!(
            ?stage,
            submitted = summary.submitted,
            hashed = summary.hashed(),
            failed = summary.failed(),
            "pipeline finished"
        );
        Ok(summary)
    }

    /// Like [`Pipeline::run`], but returns every outcome instead of streaming them.
    pub fn collect<I>(&self, urls: I) -> Result<Vec<Outcome>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: Send,
    {
        let mut sink = CollectSink::new();
        self.run(urls, &mut sink)?;
        Ok(sink.into_outcomes())
    }
}

/// Fetch `urls` with `parallel` workers over the default client and print
/// `<url> <digest>` lines to stdout.
pub fn run<I>(urls: I, parallel: usize) -> Result<RunSummary>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    I::IntoIter: Send,
{
    let pipeline = Pipeline::new(parallel, HttpClient::default())?;
    pipeline.run(urls, &mut LineSink::stdout())
}

/// Producer: normalize and enqueue, then close the queue by dropping `tx`.
fn produce<I>(urls: I, tx: SyncSender<Task>) -> u64
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    let mut submitted = 0u64;
    for raw in urls {
        let task = Task::new(raw.as_ref());
        if tx.send(task).is_err() {
            tracing::warn!("task queue closed before input was exhausted");
            break;
        }
        submitted += 1;
    }
    submitted
}

/// Consumer: hand each outcome to the sink until the outcome queue closes.
/// A sink error is logged and draining continues, so workers never block on a
/// dead consumer.
fn drain<S: ResultSink>(rx: Receiver<Outcome>, sink: &mut S) -> (u64, u64) {
    let mut drained = 0u64;
    let mut errors = 0u64;
    for outcome in rx {
        drained += 1;
        if let Err(e) = sink.accept(outcome) {
            if errors == 0 {
                tracing::error!("result sink failed: {:#}", e);
            }
            errors += 1;
        }
    }
    (drained, errors)
}
