//! CAS-based running extremum registers

use std::sync::atomic::{AtomicI32, Ordering};

use crossbeam_utils::CachePadded;

use crate::traits::{MaximumStrategy, MinimumStrategy};

/// Lock-free running minimum
///
/// A single atomic register updated by a compare-and-swap retry loop: read
/// the current value, return early if the new value is not smaller, otherwise
/// try to install it and retry from the observed value on failure. The
/// register is monotone (it only ever decreases once set), so a lost race
/// never loses the eventual minimum. No starvation bound is guaranteed, but
/// an update only retries while some other update succeeds.
///
/// The register starts at an in-band `i32::MAX` sentinel that readers see as
/// `0`; an event of exactly `i32::MAX` is therefore indistinguishable from an
/// empty register.
#[derive(Debug)]
pub struct AtomicMinimum {
    register: CachePadded<AtomicI32>,
}

impl AtomicMinimum {
    /// Create an empty minimum tracker
    pub fn new() -> Self {
        Self {
            register: CachePadded::new(AtomicI32::new(i32::MAX)),
        }
    }
}

impl Default for AtomicMinimum {
    fn default() -> Self {
        Self::new()
    }
}

impl MinimumStrategy for AtomicMinimum {
    fn update(&self, value: i32) {
        let mut current = self.register.load(Ordering::Relaxed);
        while value < current {
            match self.register.compare_exchange_weak(
                current,
                value,
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    fn minimum(&self) -> i32 {
        let value = self.register.load(Ordering::Acquire);
        if value == i32::MAX {
            0
        } else {
            value
        }
    }
}

/// Lock-free running maximum
///
/// Mirror image of [`AtomicMinimum`]: the register only ever increases once
/// set, starting from an `i32::MIN` sentinel that readers see as `0`.
#[derive(Debug)]
pub struct AtomicMaximum {
    register: CachePadded<AtomicI32>,
}

impl AtomicMaximum {
    /// Create an empty maximum tracker
    pub fn new() -> Self {
        Self {
            register: CachePadded::new(AtomicI32::new(i32::MIN)),
        }
    }
}

impl Default for AtomicMaximum {
    fn default() -> Self {
        Self::new()
    }
}

impl MaximumStrategy for AtomicMaximum {
    fn update(&self, value: i32) {
        let mut current = self.register.load(Ordering::Relaxed);
        while value > current {
            match self.register.compare_exchange_weak(
                current,
                value,
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    fn maximum(&self) -> i32 {
        let value = self.register.load(Ordering::Acquire);
        if value == i32::MIN {
            0
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_empty_reads_zero() {
        assert_eq!(AtomicMinimum::new().minimum(), 0);
        assert_eq!(AtomicMaximum::new().maximum(), 0);
    }

    #[test]
    fn test_tracks_extremes() {
        let min = AtomicMinimum::new();
        let max = AtomicMaximum::new();

        for v in [5, -3, 17, 0, -3] {
            min.update(v);
            max.update(v);
        }

        assert_eq!(min.minimum(), -3);
        assert_eq!(max.maximum(), 17);
    }

    #[test]
    fn test_descending_and_ascending_sequences() {
        let min = AtomicMinimum::new();
        let max = AtomicMaximum::new();

        // Descending is the worst case for the minimum register (every
        // update installs), ascending for the maximum
        for v in (0..=1000).rev() {
            min.update(v);
        }
        for v in 0..=1000 {
            max.update(v);
        }

        assert_eq!(min.minimum(), 0);
        assert_eq!(max.maximum(), 1000);
    }

    #[test]
    fn test_less_extreme_updates_are_ignored() {
        let min = AtomicMinimum::new();
        min.update(10);
        min.update(50);
        assert_eq!(min.minimum(), 10);

        let max = AtomicMaximum::new();
        max.update(10);
        max.update(5);
        assert_eq!(max.maximum(), 10);
    }

    #[test]
    fn test_concurrent_updates_never_lose_the_extreme() {
        let min = Arc::new(AtomicMinimum::new());
        let max = Arc::new(AtomicMaximum::new());

        let mut handles = Vec::new();
        for t in 0..8 {
            let min = Arc::clone(&min);
            let max = Arc::clone(&max);
            handles.push(thread::spawn(move || {
                for j in 0..10_000 {
                    let v = t * 10_000 + j;
                    min.update(v);
                    max.update(v);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(min.minimum(), 0);
        assert_eq!(max.maximum(), 79_999);
    }
}
