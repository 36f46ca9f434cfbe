//! Bounded multi-producer event ring

use std::cell::UnsafeCell;
use std::hint;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_utils::CachePadded;

/// One ring slot: an event cell plus its hand-off stamp.
///
/// The stamp encodes ownership. For a slot at index `i` of a ring with
/// capacity `c`, stamp `s` means:
/// - `s == seq` (where `seq & mask == i`): free, waiting for the producer
///   that claimed `seq`;
/// - `s == seq + 1`: published, waiting for the consumer to reach `seq`;
/// - the consumer releases the slot by storing `seq + c`, handing it to the
///   producer that will claim sequence `seq + c`.
struct Slot {
    stamp: AtomicU64,
    value: UnsafeCell<i32>,
}

/// Fixed-capacity ring carrying events from many producers to one consumer.
///
/// Producers claim a unique sequence number by incrementing the head
/// counter, so no two producers ever claim the same slot, and the per-slot
/// stamp protocol above means the consumer can never read a slot that has
/// not been published. The ring is bounded: a producer whose claimed slot is
/// still unconsumed spin-waits (yielding the processor) until the consumer
/// frees it, rather than overwriting unread events.
///
/// Slots and both counters are cache-padded; adjacent slots are
/// independently mutated by different producers and would otherwise share
/// cache lines.
pub(crate) struct EventRing {
    slots: Box<[CachePadded<Slot>]>,
    mask: u64,
    head: CachePadded<AtomicU64>,
    tail: CachePadded<AtomicU64>,
}

// The UnsafeCell is governed by the stamp protocol: exactly one thread may
// touch a slot's value at any time (the claiming producer before the
// publish store, the consumer after it), with acquire/release on the stamp
// ordering the accesses.
unsafe impl Send for EventRing {}
unsafe impl Sync for EventRing {}

impl EventRing {
    /// Create a ring with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics unless `capacity` is a power of two of at least 2 (slot
    /// selection is a mask of the sequence number).
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two() && capacity >= 2,
            "ring capacity must be a power of two >= 2, got {capacity}"
        );

        let slots = (0..capacity as u64)
            .map(|seq| {
                CachePadded::new(Slot {
                    stamp: AtomicU64::new(seq),
                    value: UnsafeCell::new(0),
                })
            })
            .collect();
        Self {
            slots,
            mask: capacity as u64 - 1,
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Publish one event. Called from any number of producer threads.
    ///
    /// Waits for the claimed slot to be freed when the ring is full; never
    /// drops or overwrites an event.
    pub(crate) fn push(&self, value: i32) {
        let seq = self.head.fetch_add(1, Ordering::Relaxed);
        let slot = &self.slots[(seq & self.mask) as usize];

        let mut spins = 0u32;
        while slot.stamp.load(Ordering::Acquire) != seq {
            // Ring full: the consumer has not yet released this slot
            spins = spins.wrapping_add(1);
            if spins % 64 == 0 {
                thread::yield_now();
            } else {
                hint::spin_loop();
            }
        }

        unsafe { *slot.value.get() = value };
        slot.stamp.store(seq + 1, Ordering::Release);
    }

    /// Take the next event, if one has been published.
    ///
    /// Must only be called from the single consumer thread.
    pub(crate) fn try_pop(&self) -> Option<i32> {
        let seq = self.tail.load(Ordering::Relaxed);
        let slot = &self.slots[(seq & self.mask) as usize];

        if slot.stamp.load(Ordering::Acquire) != seq + 1 {
            return None;
        }

        let value = unsafe { *slot.value.get() };
        slot.stamp
            .store(seq + self.slots.len() as u64, Ordering::Release);
        self.tail.store(seq + 1, Ordering::Release);
        Some(value)
    }

    /// Number of claimed-but-unconsumed sequence numbers.
    pub(crate) fn backlog(&self) -> u64 {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        head.saturating_sub(tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_fifo_within_a_single_producer() {
        let ring = EventRing::new(8);

        for v in [3, 1, 4, 1, 5] {
            ring.push(v);
        }

        let drained: Vec<i32> = std::iter::from_fn(|| ring.try_pop()).collect();
        assert_eq!(drained, [3, 1, 4, 1, 5]);
        assert_eq!(ring.backlog(), 0);
    }

    #[test]
    fn test_pop_on_empty_ring_returns_none() {
        let ring = EventRing::new(4);
        assert!(ring.try_pop().is_none());

        ring.push(7);
        assert_eq!(ring.try_pop(), Some(7));
        assert!(ring.try_pop().is_none());
    }

    #[test]
    fn test_slots_are_reused_across_wraparound() {
        let ring = EventRing::new(4);

        for round in 0..10 {
            for i in 0..4 {
                ring.push(round * 4 + i);
            }
            for i in 0..4 {
                assert_eq!(ring.try_pop(), Some(round * 4 + i));
            }
        }
    }

    #[test]
    fn test_full_ring_blocks_producer_until_consumer_frees_a_slot() {
        let ring = Arc::new(EventRing::new(4));
        for v in 0..4 {
            ring.push(v);
        }
        assert_eq!(ring.backlog(), 4);

        // The fifth push must wait for a pop
        let producer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.push(99))
        };

        // Give the producer time to claim its sequence and start waiting
        thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(ring.try_pop(), Some(0));
        producer.join().unwrap();

        let drained: Vec<i32> = std::iter::from_fn(|| ring.try_pop()).collect();
        assert_eq!(drained, [1, 2, 3, 99]);
    }

    #[test]
    fn test_concurrent_producers_deliver_every_event() {
        let ring = Arc::new(EventRing::new(64));
        let producers = 4;
        let per_producer = 10_000;

        let mut handles = Vec::new();
        for t in 0..producers {
            let ring = Arc::clone(&ring);
            handles.push(thread::spawn(move || {
                for j in 0..per_producer {
                    ring.push(t * per_producer + j);
                }
            }));
        }

        // Single consumer drains while producers run
        let mut seen = vec![false; (producers * per_producer) as usize];
        let mut drained = 0usize;
        while drained < seen.len() {
            if let Some(value) = ring.try_pop() {
                let index = value as usize;
                assert!(!seen[index], "event {value} delivered twice");
                seen[index] = true;
                drained += 1;
            } else {
                hint::spin_loop();
            }
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_non_power_of_two_capacity_is_rejected() {
        let _ = EventRing::new(1000);
    }
}
