//! Fixed-size pool of resolution workers.
//!
//! The pool pushes the whole batch into a [`DispatchQueue`] sized to the
//! batch, starts exactly `worker_count` workers and waits on a
//! [`WorkTracker`] until every record is accounted for. Each worker pops one
//! record at a time, asks the resolver for its branch, classifies it and
//! writes exactly one outcome (or none, for skipped records) into the run's
//! [`OutcomeBuckets`].
//!
//! A failed lookup becomes a [`ResolutionOutcome::Failed`] entry. It never
//! aborts the run and it is never retried.

use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

use super::BranchResolver;
use super::aggregator::OutcomeBuckets;
use super::classifier::BranchClassifier;
use super::queue::{DispatchQueue, QueueReceiver};
use super::tracker::{WorkTracker, WorkUnit};
use crate::constants::DEFAULT_WORKER_COUNT;
use crate::models::{DependencyRecord, ResolutionOutcome};
use crate::utils::progress::ProgressBar;

/// A queued record together with the work unit it holds.
///
/// An item dropped before [`settle`](Self::settle) was lost to a worker that
/// panicked, or left in the queue after every worker stopped. The loss is
/// logged with the module path before the unit is retired.
struct WorkItem {
    record: DependencyRecord,
    settled: bool,
    _unit: WorkUnit,
}

impl WorkItem {
    fn new(record: DependencyRecord, unit: WorkUnit) -> Self {
        Self {
            record,
            settled: false,
            _unit: unit,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for WorkItem {
    fn drop(&mut self) {
        if !self.settled {
            error!(
                target: "pipeline",
                "No outcome recorded for {}: its worker stopped before finishing it",
                self.record.module_path
            );
        }
    }
}

/// Runs branch resolution for a batch of records.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use v2b_cli::git::GitBranchResolver;
/// use v2b_cli::models::{DependencyRecord, RunConfiguration};
/// use v2b_cli::resolver::{BranchClassifier, WorkerPool, merge};
///
/// # async fn example() -> anyhow::Result<()> {
/// let records = vec![DependencyRecord::new(1, "github.com/x/a", "v0.0.0-20240101000000-abcdef123456")];
/// let pool = WorkerPool::new(Arc::new(GitBranchResolver::new()), BranchClassifier::default())
///     .with_workers(4);
/// let buckets = pool.run(records).await?;
/// let merged = merge(&buckets, &RunConfiguration::default());
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool<R> {
    resolver: Arc<R>,
    classifier: Arc<BranchClassifier>,
    worker_count: usize,
    progress: Option<ProgressBar>,
}

impl<R> WorkerPool<R>
where
    R: BranchResolver + 'static,
{
    pub fn new(resolver: Arc<R>, classifier: BranchClassifier) -> Self {
        Self {
            resolver,
            classifier: Arc::new(classifier),
            worker_count: DEFAULT_WORKER_COUNT,
            progress: None,
        }
    }

    /// Sets the number of workers. Zero is treated as one.
    #[must_use]
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        if worker_count == 0 {
            warn!(target: "pipeline", "Worker count 0 requested, using 1");
        }
        self.worker_count = worker_count.max(1);
        self
    }

    /// Ticks `progress` once per retired record.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Resolves every record and returns the filled buckets.
    ///
    /// Returns only after every record has been processed.
    ///
    /// # Errors
    ///
    /// Lookup failures are recorded as outcomes and never returned here. An
    /// error means the pool itself broke: the batch did not fit the queue.
    pub async fn run(&self, records: Vec<DependencyRecord>) -> Result<Arc<OutcomeBuckets>> {
        let total = records.len();
        let buckets = Arc::new(OutcomeBuckets::new());
        let tracker = WorkTracker::new();
        let queue = DispatchQueue::with_capacity(total);

        debug!(
            target: "pipeline",
            "Dispatching {} records to {} workers",
            total,
            self.worker_count
        );

        let handles: Vec<_> = (0..self.worker_count)
            .map(|worker_id| {
                let worker = Worker {
                    id: worker_id,
                    receiver: queue.receiver(),
                    resolver: Arc::clone(&self.resolver),
                    classifier: Arc::clone(&self.classifier),
                    buckets: Arc::clone(&buckets),
                    progress: self.progress.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        let expected = records.iter().filter(|record| !record.is_skipped()).count();
        for record in records {
            queue.push(WorkItem::new(record, tracker.unit()))?;
        }
        queue.close();

        tracker.wait_idle().await;

        let mut crashed = 0usize;
        for (worker_id, result) in join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = result {
                crashed += 1;
                error!(target: "pipeline", "Worker {} stopped abnormally: {}", worker_id, e);
            }
        }
        if crashed > 0 {
            error!(
                target: "pipeline",
                "{} of {} workers crashed; {} of {} dispatched records have an outcome",
                crashed,
                self.worker_count,
                buckets.total(),
                expected
            );
        }

        debug!(
            target: "pipeline",
            "Run finished: {} ordinary, {} special, {} failed",
            buckets.ordinary.len(),
            buckets.special.len(),
            buckets.failed.len()
        );

        Ok(buckets)
    }
}

struct Worker<R> {
    id: usize,
    receiver: QueueReceiver<WorkItem>,
    resolver: Arc<R>,
    classifier: Arc<BranchClassifier>,
    buckets: Arc<OutcomeBuckets>,
    progress: Option<ProgressBar>,
}

impl<R> Worker<R>
where
    R: BranchResolver + 'static,
{
    async fn run(self) {
        let mut processed = 0usize;
        while let Some(item) = self.receiver.pop().await {
            if let Some(outcome) =
                process_record(item.record.clone(), self.resolver.as_ref(), &self.classifier).await
            {
                self.buckets.record(outcome);
            }
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
            processed += 1;
            item.settle();
        }
        trace!(target: "pipeline", "Worker {} exiting after {} records", self.id, processed);
    }
}

/// Resolves and classifies a single record.
///
/// Returns `None` for skipped records (no `.` in the module path, or an
/// empty version).
pub async fn process_record<R: BranchResolver>(
    record: DependencyRecord,
    resolver: &R,
    classifier: &BranchClassifier,
) -> Option<ResolutionOutcome> {
    if record.is_skipped() {
        trace!(target: "pipeline", "Skipping {} ({:?})", record.module_path, record.version);
        return None;
    }

    match resolver.resolve_branch(&record.module_path, &record.commit_reference).await {
        Ok(branch) => {
            let outcome = if classifier.is_special(&branch) {
                ResolutionOutcome::Special {
                    module_path: record.module_path,
                    version: record.version,
                    branch,
                }
            } else {
                ResolutionOutcome::Ordinary {
                    module_path: record.module_path,
                    version: record.version,
                    branch,
                }
            };
            Some(outcome)
        }
        Err(e) => {
            debug!(
                target: "pipeline",
                "Failed to resolve branch for {}@{}: {:#}",
                record.module_path,
                record.commit_reference,
                e
            );
            Some(ResolutionOutcome::Failed {
                module_path: record.module_path,
                version: record.version,
                reason: format!("{e:#}"),
            })
        }
    }
}
