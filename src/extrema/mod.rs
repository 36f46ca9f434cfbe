//! Running minimum/maximum trackers
//!
//! Lock-free compare-and-swap accumulators for the extremes of an event
//! stream. Updates from any number of threads never block and never lose a
//! more extreme value.
//!
//! # Example
//!
//! ```
//! use livestats::extrema::AtomicMinimum;
//! use livestats::traits::MinimumStrategy;
//!
//! let min = AtomicMinimum::new();
//!
//! for value in [17, 4, 96] {
//!     min.update(value);
//! }
//!
//! assert_eq!(min.minimum(), 4);
//! ```

mod atomic;

pub use atomic::{AtomicMaximum, AtomicMinimum};
