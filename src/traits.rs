//! Core traits for the statistics engine
//!
//! All engine variants implement the base [`Statistics`] trait. The composed
//! engine ([`ConcurrentStats`](crate::ConcurrentStats)) is assembled from three
//! narrower strategy traits, one per summary family (minimum, maximum,
//! mean/variance), so each family can pick its own concurrency discipline.

/// A point-in-time summary of an engine's statistics.
///
/// Each field is individually consistent at the moment it was read; the struct
/// as a whole is not a single atomic snapshot of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    /// Smallest event observed, `0` before any event
    pub min: i32,
    /// Largest event observed, `0` before any event
    pub max: i32,
    /// Running mean, `0.0` before any event
    pub mean: f32,
    /// Running population variance, `0.0` before the second event
    pub variance: f32,
    /// Number of events applied
    pub count: u64,
}

/// The engine contract: concurrent ingestion, concurrent reads.
///
/// Implementations are shared across threads by reference; `event` is called
/// from any number of producer threads while readers call the accessors.
/// Readers never observe a torn combination of `count`, mean and variance,
/// and any event fully applied before an accessor call returns is reflected
/// in its result.
pub trait Statistics: Send + Sync {
    /// Ingest one event.
    ///
    /// Never fails. Never blocks, beyond the bounded exclusive section of
    /// lock-based variants and the full-ring wait of the single-writer
    /// pipeline.
    fn event(&self, value: i32);

    /// Minimum of all events consumed, `0` before any event.
    fn min(&self) -> i32;

    /// Maximum of all events consumed, `0` before any event.
    fn max(&self) -> i32;

    /// Mean of all events consumed, `0.0` before any event.
    fn mean(&self) -> f32;

    /// Population variance of all events consumed.
    ///
    /// `0.0` before any event and after exactly one event.
    fn variance(&self) -> f32;

    /// Number of events applied so far.
    fn count(&self) -> u64;

    /// Check if no event has been applied yet.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Read all summaries at once.
    ///
    /// See [`StatsSnapshot`] for the consistency caveat.
    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            min: self.min(),
            max: self.max(),
            mean: self.mean(),
            variance: self.variance(),
            count: self.count(),
        }
    }
}

/// Running-minimum strategy.
pub trait MinimumStrategy: Send + Sync {
    /// Observe one event.
    fn update(&self, value: i32);

    /// Smallest observed event, `0` before any event.
    fn minimum(&self) -> i32;
}

/// Running-maximum strategy.
pub trait MaximumStrategy: Send + Sync {
    /// Observe one event.
    fn update(&self, value: i32);

    /// Largest observed event, `0` before any event.
    fn maximum(&self) -> i32;
}

/// Running mean/variance strategy.
///
/// The provided implementations differ only in concurrency discipline:
/// [`LockedWelford`](crate::welford::LockedWelford) serializes writers behind
/// a versioned lock, [`BatchedWelford`](crate::welford::BatchedWelford) and
/// [`LockFreeWelford`](crate::welford::LockFreeWelford) batch per thread and
/// merge periodically.
pub trait MeanVarianceStrategy: Send + Sync {
    /// Observe one event.
    fn update(&self, value: i32);

    /// Running mean, `0.0` before any event.
    fn mean(&self) -> f32;

    /// Running population variance, `0.0` before the second event.
    fn variance(&self) -> f32;

    /// Number of events applied.
    fn count(&self) -> u64;
}
