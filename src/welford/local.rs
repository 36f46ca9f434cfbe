//! Per-thread batching lanes
//!
//! Shared machinery for the batched and lock-free strategies: a fixed pool of
//! cache-padded, mutex-guarded accumulation lanes, with each producing thread
//! pinned to one lane by a process-wide thread id. In the common case (at
//! most [`LANES`] producer threads) a lane's mutex is uncontended except when
//! a reader drains it, so the hot path costs one uncontended lock plus the
//! Welford recurrence.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

use crate::welford::WelfordAggregate;

/// Number of batching lanes; power of two so lane selection is a mask.
const LANES: usize = 64;

/// Events accumulated locally before a lane is handed to the strategy.
pub(crate) const DEFAULT_BATCH_THRESHOLD: u64 = 1000;

static NEXT_THREAD_SLOT: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static THREAD_SLOT: Cell<usize> = Cell::new(NEXT_THREAD_SLOT.fetch_add(1, Ordering::Relaxed));
}

/// Fixed pool of per-thread accumulation lanes.
///
/// Lanes belonging to exited threads simply stay in the pool with whatever
/// they had pending and are picked up by the next forced drain (or reused by
/// a later thread that maps to the same lane), so no liveness bookkeeping is
/// needed.
pub(crate) struct LocalShards {
    lanes: Box<[CachePadded<Mutex<WelfordAggregate>>]>,
    threshold: u64,
}

impl LocalShards {
    pub(crate) fn new(threshold: u64) -> Self {
        assert!(threshold >= 1, "batch threshold must be at least 1");

        let lanes = (0..LANES)
            .map(|_| CachePadded::new(Mutex::new(WelfordAggregate::new())))
            .collect();
        Self { lanes, threshold }
    }

    fn lane(&self) -> &Mutex<WelfordAggregate> {
        let slot = THREAD_SLOT.with(Cell::get);
        &self.lanes[slot & (LANES - 1)]
    }

    /// Fold one event into the calling thread's lane.
    ///
    /// Returns the lane's aggregate (and resets the lane) once it has
    /// accumulated `threshold` events; the caller decides how the filled
    /// batch reaches shared state.
    pub(crate) fn record(&self, value: i32) -> Option<WelfordAggregate> {
        let mut lane = self.lane().lock();
        lane.push(value);
        if lane.count() >= self.threshold {
            let filled = *lane;
            *lane = WelfordAggregate::new();
            Some(filled)
        } else {
            None
        }
    }

    /// Drain every lane with pending data into `sink`, resetting the lanes.
    ///
    /// Called by readers to force events below the batch threshold into
    /// shared state before computing a result. O(number of lanes).
    pub(crate) fn drain(&self, mut sink: impl FnMut(WelfordAggregate)) {
        for lane in self.lanes.iter() {
            let mut lane = lane.lock();
            if !lane.is_empty() {
                let filled = *lane;
                *lane = WelfordAggregate::new();
                sink(filled);
            }
        }
    }
}
