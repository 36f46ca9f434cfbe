//! # Livestats
//!
//! Concurrent online statistics for Rust.
//!
//! Livestats ingests a high-rate stream of integer events from any number of
//! producer threads and maintains the running minimum, maximum, mean and
//! variance, readable at any time by any number of reader threads, without
//! locking producers out for long and without ever exposing a torn numeric
//! result.
//!
//! ## Strategies
//!
//! Mean and variance use Welford's single-pass algorithm everywhere; what
//! differs between the engine variants is how concurrent writers reach the
//! aggregate:
//!
//! - **Versioned lock** ([`welford::LockedWelford`]): exclusive writes,
//!   optimistic stamp-validated reads. The baseline.
//! - **Thread-local batching** ([`welford::BatchedWelford`]): each producer
//!   accumulates privately and merges once per batch; readers force a flush.
//! - **Lock-free merging** ([`welford::LockFreeWelford`]): batches flow
//!   through a lock-free queue into a CAS-published immutable aggregate.
//! - **Single-writer pipeline** ([`pipeline::SingleWriterStats`]): producers
//!   publish into a bounded ring; one consumer thread owns all state and
//!   republishes eventually-consistent summaries.
//!
//! Minimum and maximum are tracked by lock-free CAS registers
//! ([`extrema::AtomicMinimum`], [`extrema::AtomicMaximum`]) in every
//! composition except the pipeline, which folds them into its consumer.
//!
//! ## Quick Start
//!
//! ```rust
//! use livestats::prelude::*;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let stats = Arc::new(ConcurrentStats::batched());
//!
//! let mut producers = Vec::new();
//! for _ in 0..4 {
//!     let stats = Arc::clone(&stats);
//!     producers.push(thread::spawn(move || {
//!         for value in 0..1000 {
//!             stats.event(value);
//!         }
//!     }));
//! }
//! for producer in producers {
//!     producer.join().unwrap();
//! }
//!
//! assert_eq!(stats.min(), 0);
//! assert_eq!(stats.max(), 999);
//! assert_eq!(stats.count(), 4000);
//! assert!((stats.mean() - 499.5).abs() < 0.01);
//! ```
//!
//! ## Custom compositions
//!
//! The engine is assembled from three strategy traits (minimum, maximum,
//! mean/variance), so any family can be swapped independently:
//!
//! ```rust
//! use livestats::{ConcurrentStats, Statistics};
//! use livestats::extrema::{AtomicMinimum, AtomicMaximum};
//! use livestats::welford::LockFreeWelford;
//!
//! let stats = ConcurrentStats::builder()
//!     .minimum(AtomicMinimum::new())
//!     .maximum(AtomicMaximum::new())
//!     .mean_variance(LockFreeWelford::new())
//!     .build()
//!     .expect("all strategies supplied");
//!
//! stats.event(42);
//! assert_eq!(stats.snapshot().max, 42);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`traits::StatsSnapshot`]

pub mod extrema;
pub mod pipeline;
pub mod traits;
pub mod welford;

mod facade;

pub mod prelude {
    pub use crate::facade::{BuildError, ConcurrentStats, StatsBuilder};
    pub use crate::pipeline::SingleWriterStats;
    pub use crate::traits::*;
}

pub use facade::{BuildError, ConcurrentStats, StatsBuilder};
pub use traits::{Statistics, StatsSnapshot};
