//! Strategy composition
//!
//! [`ConcurrentStats`] wires one minimum tracker, one maximum tracker and one
//! mean/variance aggregator (they share no state with each other) behind
//! the [`Statistics`] contract. The strategies are injected, so the
//! concurrency discipline of each family is chosen at construction time.

use thiserror::Error;

use crate::extrema::{AtomicMaximum, AtomicMinimum};
use crate::traits::{MaximumStrategy, MeanVarianceStrategy, MinimumStrategy, Statistics};
use crate::welford::{BatchedWelford, LockFreeWelford, LockedWelford};

/// A required strategy was not supplied to [`StatsBuilder`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// No minimum strategy was provided
    #[error("minimum strategy is required")]
    MissingMinimum,
    /// No maximum strategy was provided
    #[error("maximum strategy is required")]
    MissingMaximum,
    /// No mean/variance strategy was provided
    #[error("mean/variance strategy is required")]
    MissingMeanVariance,
}

/// Statistics engine composed from injectable strategies
///
/// Every event is forwarded to all three strategies independently; every
/// accessor is answered by the strategy that owns it. The convenience
/// constructors pair the CAS extremum trackers with each of the three
/// aggregators; [`StatsBuilder`] accepts arbitrary implementations of the
/// strategy traits.
///
/// # Example
///
/// ```
/// use livestats::{ConcurrentStats, Statistics};
///
/// let stats = ConcurrentStats::locked();
///
/// for value in [10, 20, 30] {
///     stats.event(value);
/// }
///
/// assert_eq!(stats.min(), 10);
/// assert_eq!(stats.max(), 30);
/// assert!((stats.mean() - 20.0).abs() < 0.01);
/// assert!((stats.variance() - 66.67).abs() < 0.1);
/// ```
pub struct ConcurrentStats {
    minimum: Box<dyn MinimumStrategy>,
    maximum: Box<dyn MaximumStrategy>,
    mean_variance: Box<dyn MeanVarianceStrategy>,
}

impl ConcurrentStats {
    /// Start assembling an engine from custom strategies.
    pub fn builder() -> StatsBuilder {
        StatsBuilder::default()
    }

    /// Engine with the versioned-lock aggregator
    /// ([`LockedWelford`](crate::welford::LockedWelford)); the default
    /// composition.
    pub fn locked() -> Self {
        Self {
            minimum: Box::new(AtomicMinimum::new()),
            maximum: Box::new(AtomicMaximum::new()),
            mean_variance: Box::new(LockedWelford::new()),
        }
    }

    /// Engine with the thread-local batched aggregator
    /// ([`BatchedWelford`](crate::welford::BatchedWelford)).
    pub fn batched() -> Self {
        Self {
            minimum: Box::new(AtomicMinimum::new()),
            maximum: Box::new(AtomicMaximum::new()),
            mean_variance: Box::new(BatchedWelford::new()),
        }
    }

    /// Engine with the lock-free snapshot-merge aggregator
    /// ([`LockFreeWelford`](crate::welford::LockFreeWelford)).
    pub fn lock_free() -> Self {
        Self {
            minimum: Box::new(AtomicMinimum::new()),
            maximum: Box::new(AtomicMaximum::new()),
            mean_variance: Box::new(LockFreeWelford::new()),
        }
    }
}

impl Default for ConcurrentStats {
    fn default() -> Self {
        Self::locked()
    }
}

impl Statistics for ConcurrentStats {
    fn event(&self, value: i32) {
        self.minimum.update(value);
        self.maximum.update(value);
        self.mean_variance.update(value);
    }

    fn min(&self) -> i32 {
        self.minimum.minimum()
    }

    fn max(&self) -> i32 {
        self.maximum.maximum()
    }

    fn mean(&self) -> f32 {
        self.mean_variance.mean()
    }

    fn variance(&self) -> f32 {
        self.mean_variance.variance()
    }

    fn count(&self) -> u64 {
        self.mean_variance.count()
    }
}

/// Builder validating that all three strategies are present.
///
/// # Example
///
/// ```
/// use livestats::{ConcurrentStats, BuildError};
/// use livestats::extrema::{AtomicMinimum, AtomicMaximum};
/// use livestats::welford::LockFreeWelford;
///
/// let stats = ConcurrentStats::builder()
///     .minimum(AtomicMinimum::new())
///     .maximum(AtomicMaximum::new())
///     .mean_variance(LockFreeWelford::new())
///     .build()
///     .unwrap();
///
/// let missing = ConcurrentStats::builder()
///     .minimum(AtomicMinimum::new())
///     .build();
/// assert_eq!(missing.err(), Some(BuildError::MissingMaximum));
/// ```
#[derive(Default)]
pub struct StatsBuilder {
    minimum: Option<Box<dyn MinimumStrategy>>,
    maximum: Option<Box<dyn MaximumStrategy>>,
    mean_variance: Option<Box<dyn MeanVarianceStrategy>>,
}

impl StatsBuilder {
    /// Set the minimum strategy.
    pub fn minimum(mut self, strategy: impl MinimumStrategy + 'static) -> Self {
        self.minimum = Some(Box::new(strategy));
        self
    }

    /// Set the maximum strategy.
    pub fn maximum(mut self, strategy: impl MaximumStrategy + 'static) -> Self {
        self.maximum = Some(Box::new(strategy));
        self
    }

    /// Set the mean/variance strategy.
    pub fn mean_variance(mut self, strategy: impl MeanVarianceStrategy + 'static) -> Self {
        self.mean_variance = Some(Box::new(strategy));
        self
    }

    /// Assemble the engine.
    ///
    /// Fails if any strategy is absent; the engine never exists in a
    /// partially-wired state.
    pub fn build(self) -> Result<ConcurrentStats, BuildError> {
        let minimum = self.minimum.ok_or(BuildError::MissingMinimum)?;
        let maximum = self.maximum.ok_or(BuildError::MissingMaximum)?;
        let mean_variance = self.mean_variance.ok_or(BuildError::MissingMeanVariance)?;

        Ok(ConcurrentStats {
            minimum,
            maximum,
            mean_variance,
        })
    }
}
