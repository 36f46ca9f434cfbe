//! Thread-local batched aggregation

use seqlock::SeqLock;

use crate::traits::MeanVarianceStrategy;
use crate::welford::local::{LocalShards, DEFAULT_BATCH_THRESHOLD};
use crate::welford::WelfordAggregate;

/// Mean/variance aggregation batched per producing thread
///
/// Each producing thread accumulates events in its own lane with no
/// cross-thread contention; once a lane reaches the batch threshold its
/// aggregate is merged into the shared aggregate under a short exclusive
/// section and the lane resets. Writers therefore touch shared state once
/// per `threshold` events instead of once per event.
///
/// Readers force-drain every lane with pending data into the shared
/// aggregate before taking an optimistic versioned read, making reads
/// O(number of lanes) rather than O(1): read latency is traded for write
/// throughput. Between reads, up to `threshold - 1` events per thread sit in
/// lanes invisible to other threads; that staleness bound is the point of
/// the design, not a defect.
///
/// # Example
///
/// ```
/// use livestats::welford::BatchedWelford;
/// use livestats::traits::MeanVarianceStrategy;
///
/// let agg = BatchedWelford::new();
///
/// for value in [10, 20, 30] {
///     agg.update(value);
/// }
///
/// // Reads flush pending batches first, so nothing is missing
/// assert_eq!(agg.count(), 3);
/// assert!((agg.mean() - 20.0).abs() < 0.01);
/// ```
pub struct BatchedWelford {
    locals: LocalShards,
    shared: SeqLock<WelfordAggregate>,
}

impl BatchedWelford {
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
            shared: SeqLock::new(WelfordAggregate::new()),
        }
    }

    fn merge_into_shared(&self, batch: WelfordAggregate) {
        let mut guard = self.shared.lock_write();
        guard.merge(&batch);
    }

    /// Flush all pending lanes, then read the shared aggregate.
    fn flush_and_read(&self) -> WelfordAggregate {
        self.locals.drain(|batch| self.merge_into_shared(batch));
        self.shared.read()
    }
}

impl Default for BatchedWelford {
    fn default() -> Self {
        Self::new()
    }
}

impl MeanVarianceStrategy for BatchedWelford {
    fn update(&self, value: i32) {
        if let Some(batch) = self.locals.record(value) {
            self.merge_into_shared(batch);
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
