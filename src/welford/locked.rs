//! Versioned-lock aggregation

use seqlock::SeqLock;

use crate::traits::MeanVarianceStrategy;
use crate::welford::WelfordAggregate;

/// Mean/variance aggregation behind a versioned lock
///
/// Writers take a short exclusive section per event and apply the Welford
/// recurrence to a single shared aggregate. Readers use the sequence-lock
/// optimistic protocol: read the version stamp, copy the whole
/// `(count, mean, m2)` triple, and re-validate the stamp, retrying if a
/// writer was active in between. Readers never block writers and never
/// observe a torn combination of the three fields; with no concurrent writer
/// the read costs two stamp loads and a copy.
///
/// The simplest strategy, and the baseline the batched variants are measured
/// against: every event contends on the same lock, so write throughput
/// degrades with producer count.
///
/// # Example
///
/// ```
/// use livestats::welford::LockedWelford;
/// use livestats::traits::MeanVarianceStrategy;
///
/// let agg = LockedWelford::new();
///
/// for value in [10, 20, 30] {
///     agg.update(value);
/// }
///
/// assert!((agg.mean() - 20.0).abs() < 0.01);
/// assert!((agg.variance() - 66.67).abs() < 0.1);
/// ```
pub struct LockedWelford {
    state: SeqLock<WelfordAggregate>,
}

impl Default for LockedWelford {
    fn default() -> Self {
        Self::new()
    }
}

impl LockedWelford {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self {
            state: SeqLock::new(WelfordAggregate::new()),
        }
    }

    fn read(&self) -> WelfordAggregate {
        self.state.read()
    }
}

impl MeanVarianceStrategy for LockedWelford {
    fn update(&self, value: i32) {
        let mut guard = self.state.lock_write();
        guard.push(value);
    }

    fn mean(&self) -> f32 {
        self.read().mean() as f32
    }

    fn variance(&self) -> f32 {
        self.read().variance() as f32
    }

    fn count(&self) -> u64 {
        self.read().count()
    }
}
