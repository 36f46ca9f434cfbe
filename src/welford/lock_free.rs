//! Lock-free snapshot-merge aggregation

use arc_swap::ArcSwap;
use crossbeam_queue::SegQueue;

use crate::traits::MeanVarianceStrategy;
use crate::welford::local::{LocalShards, DEFAULT_BATCH_THRESHOLD};
use crate::welford::WelfordAggregate;

/// Mean/variance aggregation with lock-free merging
///
/// Per-thread accumulation is identical to
/// [`BatchedWelford`](crate::welford::BatchedWelford), but a filled lane is
/// never merged under a lock: it is pushed as an immutable snapshot onto a
/// lock-free multi-producer queue, and whichever thread next drains the
/// queue folds each snapshot into the shared aggregate through a
/// compare-and-swap retry loop over immutable state: read the current
/// aggregate, compute the merged successor, publish it if nobody else
/// published first, otherwise retry from the winner's result. Every snapshot
/// popped from the queue is merged exactly once; a lost race costs only the
/// recomputation.
///
/// Readers drain pending lanes into the queue and then drain the queue
/// before loading the shared aggregate, so nothing
/// already-flushed-but-unmerged is omitted from a result.
///
/// # Example
///
/// ```
/// use livestats::welford::LockFreeWelford;
/// use livestats::traits::MeanVarianceStrategy;
///
/// let agg = LockFreeWelford::new();
///
/// for value in [10, 20, 30] {
///     agg.update(value);
/// }
///
/// assert_eq!(agg.count(), 3);
/// assert!((agg.mean() - 20.0).abs() < 0.01);
/// ```
pub struct LockFreeWelford {
    locals: LocalShards,
    pending: SegQueue<WelfordAggregate>,
    shared: ArcSwap<WelfordAggregate>,
}

impl LockFreeWelford {
    /// Create an aggregator with the default batch threshold (1000 events)
    pub fn new() -> Self {
        Self::with_batch_threshold(DEFAULT_BATCH_THRESHOLD)
    }

    /// Create an aggregator flushing each thread's lane every `threshold`
    /// events
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is zero.
    pub fn with_batch_threshold(threshold: u64) -> Self {
        Self {
            locals: LocalShards::new(threshold),
            pending: SegQueue::new(),
            shared: ArcSwap::from_pointee(WelfordAggregate::new()),
        }
    }

    fn merge_shared(&self, batch: WelfordAggregate) {
        self.shared.rcu(|current| {
            let mut merged = **current;
            merged.merge(&batch);
            merged
        });
    }

    /// Flush lanes and fold every queued snapshot, then load the aggregate.
    fn flush_and_read(&self) -> WelfordAggregate {
        self.locals.drain(|batch| self.pending.push(batch));
        while let Some(batch) = self.pending.pop() {
            self.merge_shared(batch);
        }
        **self.shared.load()
    }
}

impl Default for LockFreeWelford {
    fn default() -> Self {
        Self::new()
    }
}

impl MeanVarianceStrategy for LockFreeWelford {
    fn update(&self, value: i32) {
        if let Some(batch) = self.locals.record(value) {
            self.pending.push(batch);
        }
    }

    fn mean(&self) -> f32 {
        self.flush_and_read().mean() as f32
    }

    fn variance(&self) -> f32 {
        self.flush_and_read().variance() as f32
    }

    fn count(&self) -> u64 {
        self.flush_and_read().count()
    }
}
