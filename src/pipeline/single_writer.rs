//! Single-writer statistics pipeline

use std::hint;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_utils::CachePadded;
use tracing::debug;

use crate::pipeline::ring::EventRing;
use crate::traits::Statistics;
use crate::welford::WelfordAggregate;

/// Default ring capacity, sized for bursts well beyond the consumer's
/// per-event cost.
pub const DEFAULT_RING_CAPACITY: usize = 1024;

/// Summary fields published by the consumer thread and read by everyone
/// else. Each field is stored with release ordering after an event is
/// applied and loaded with acquire ordering, so readers see an
/// eventually-consistent, never-torn value per field. The floating summaries
/// travel as `f32` bit patterns.
struct PublishedSummary {
    min: CachePadded<AtomicI32>,
    max: CachePadded<AtomicI32>,
    mean_bits: CachePadded<AtomicU32>,
    variance_bits: CachePadded<AtomicU32>,
    count: CachePadded<AtomicU64>,
}

impl PublishedSummary {
    fn new() -> Self {
        Self {
            min: CachePadded::new(AtomicI32::new(0)),
            max: CachePadded::new(AtomicI32::new(0)),
            mean_bits: CachePadded::new(AtomicU32::new(0.0f32.to_bits())),
            variance_bits: CachePadded::new(AtomicU32::new(0.0f32.to_bits())),
            count: CachePadded::new(AtomicU64::new(0)),
        }
    }
}

/// Statistics engine with exactly one writer of aggregate state
///
/// Producers never touch the aggregate: `event` claims a slot in a bounded
/// ring and publishes the value there, which makes the producer path a
/// sequence increment plus one store. A dedicated consumer thread busy-polls
/// the ring (spin hint plus a processor yield on idle iterations, never a
/// sleep), applies the Welford recurrence and the extremum updates to state
/// only it can write, and republishes the derived summaries after every
/// event. Write-write contention on the aggregate is gone by construction.
///
/// Readers are wait-free and see summaries that lag the ring by however far
/// the consumer is behind; [`count`](Statistics::count) reports how many
/// events have actually been applied. Dropping the engine stops the
/// consumer after it drains whatever is still in the ring.
///
/// The ring is bounded: a producer that outruns the consumer by a full ring
/// waits for a slot instead of overwriting unconsumed events; see
/// [`crate::pipeline`] for the trade-off.
///
/// # Example
///
/// ```
/// use livestats::pipeline::SingleWriterStats;
/// use livestats::traits::Statistics;
///
/// let stats = SingleWriterStats::new();
///
/// for value in [10, 20, 30] {
///     stats.event(value);
/// }
///
/// // The consumer applies events asynchronously
/// while stats.count() < 3 {
///     std::thread::yield_now();
/// }
/// assert_eq!(stats.min(), 10);
/// assert_eq!(stats.max(), 30);
/// assert!((stats.mean() - 20.0).abs() < 0.01);
/// ```
pub struct SingleWriterStats {
    ring: Arc<EventRing>,
    published: Arc<PublishedSummary>,
    shutdown: Arc<AtomicBool>,
    consumer: Option<JoinHandle<()>>,
}

impl SingleWriterStats {
    /// Create an engine with the default ring capacity (1024 slots)
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RING_CAPACITY)
    }

    /// Create an engine with a custom ring capacity
    ///
    /// # Panics
    ///
    /// Panics unless `capacity` is a power of two of at least 2.
    pub fn with_capacity(capacity: usize) -> Self {
        let ring = Arc::new(EventRing::new(capacity));
        let published = Arc::new(PublishedSummary::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let consumer = thread::Builder::new()
            .name("livestats-consumer".into())
            .spawn({
                let ring = Arc::clone(&ring);
                let published = Arc::clone(&published);
                let shutdown = Arc::clone(&shutdown);
                move || consume(&ring, &published, &shutdown)
            })
            .expect("failed to spawn statistics consumer thread");

        Self {
            ring,
            published,
            shutdown,
            consumer: Some(consumer),
        }
    }

    /// Events published to the ring but not yet applied by the consumer.
    pub fn backlog(&self) -> u64 {
        self.ring.backlog()
    }
}

impl Default for SingleWriterStats {
    fn default() -> Self {
        Self::new()
    }
}

fn consume(ring: &EventRing, published: &PublishedSummary, shutdown: &AtomicBool) {
    debug!(capacity = ring.capacity(), "statistics consumer started");

    let mut totals = WelfordAggregate::new();
    let mut min = 0i32;
    let mut max = 0i32;

    loop {
        match ring.try_pop() {
            Some(value) => {
                if totals.is_empty() {
                    min = value;
                    max = value;
                } else {
                    min = min.min(value);
                    max = max.max(value);
                }
                totals.push(value);

                published.min.store(min, Ordering::Release);
                published.max.store(max, Ordering::Release);
                published
                    .mean_bits
                    .store((totals.mean() as f32).to_bits(), Ordering::Release);
                published
                    .variance_bits
                    .store((totals.variance() as f32).to_bits(), Ordering::Release);
                published.count.store(totals.count(), Ordering::Release);
            }
            None => {
                if shutdown.load(Ordering::Acquire) && ring.backlog() == 0 {
                    break;
                }
                hint::spin_loop();
                thread::yield_now();
            }
        }
    }

    debug!(events = totals.count(), "statistics consumer stopped");
}

impl Statistics for SingleWriterStats {
    fn event(&self, value: i32) {
        self.ring.push(value);
    }

    fn min(&self) -> i32 {
        self.published.min.load(Ordering::Acquire)
    }

    fn max(&self) -> i32 {
        self.published.max.load(Ordering::Acquire)
    }

    fn mean(&self) -> f32 {
        f32::from_bits(self.published.mean_bits.load(Ordering::Acquire))
    }

    fn variance(&self) -> f32 {
        f32::from_bits(self.published.variance_bits.load(Ordering::Acquire))
    }

    fn count(&self) -> u64 {
        self.published.count.load(Ordering::Acquire)
    }
}

impl Drop for SingleWriterStats {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(consumer) = self.consumer.take() {
            // The consumer drains the ring before exiting; nothing published
            // before the drop is lost
            let _ = consumer.join();
        }
    }
}
