//! Mean/variance aggregation strategies
//!
//! Three interchangeable implementations of
//! [`MeanVarianceStrategy`](crate::traits::MeanVarianceStrategy), all built
//! on the same [`WelfordAggregate`] state but with increasing concurrency
//! sophistication:
//!
//! - [`LockedWelford`]: one shared aggregate behind a versioned lock,
//!   optimistic reads. Simplest; every writer contends.
//! - [`BatchedWelford`]: per-thread batching, periodic merge under the lock.
//!   Writers touch shared state once per batch.
//! - [`LockFreeWelford`]: per-thread batching, snapshots merged through a
//!   lock-free queue and a CAS-published immutable aggregate. Nothing ever
//!   blocks.
//!
//! The fourth strategy,
//! [`SingleWriterStats`](crate::pipeline::SingleWriterStats), removes write
//! contention differently (every event funnels through a ring buffer to one
//! consumer thread) and lives in [`crate::pipeline`] because it owns
//! the extremum tracking as well.
//!
//! # Example
//!
//! ```
//! use livestats::welford::BatchedWelford;
//! use livestats::traits::MeanVarianceStrategy;
//!
//! let agg = BatchedWelford::new();
//!
//! for value in [2, 4, 4, 4, 5, 5, 7, 9] {
//!     agg.update(value);
//! }
//!
//! assert!((agg.mean() - 5.0).abs() < 0.001);
//! assert!((agg.variance() - 4.0).abs() < 0.001);
//! ```

mod aggregate;
mod batched;
mod lock_free;
mod locked;
pub(crate) mod local;

pub use aggregate::WelfordAggregate;
pub use batched::BatchedWelford;
pub use lock_free::LockFreeWelford;
pub use locked::LockedWelford;
