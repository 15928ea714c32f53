//! Monotonic timestamp source.
//!
//! Every rested order and every fill is stamped with the current tick.
//! [`MonotonicTimestampSource`] reads the wall clock but ratchets the result
//! through an `AtomicU64` so two calls in a row can never appear to go
//! backwards, even on platforms whose clock resolution is coarser than a
//! nanosecond.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Supplies the current tick used to stamp rested orders and events.
/// Implementations must be non-decreasing across successive calls.
pub trait TimestampSource: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall-clock-backed timestamp source, monotonic by construction.
pub struct MonotonicTimestampSource {
    epoch: Instant,
    high_water_mark: AtomicU64,
}

impl MonotonicTimestampSource {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            high_water_mark: AtomicU64::new(0),
        }
    }
}

impl Default for MonotonicTimestampSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampSource for MonotonicTimestampSource {
    fn now(&self) -> u64 {
        let observed = self.epoch.elapsed().as_nanos().min(u64::MAX as u128) as u64;
        // fetch_max ratchets the mark forward; it never reports a tick lower
        // than one already handed out, even if `observed` ties or regresses.
        let previous = self.high_water_mark.fetch_max(observed, Ordering::Relaxed);
        observed.max(previous)
    }
}

/// Deterministic timestamp source for tests: each call returns the next
/// integer in sequence starting from the configured value.
pub struct ManualTimestampSource {
    next: AtomicU64,
}

impl ManualTimestampSource {
    pub fn starting_at(value: u64) -> Self {
        Self {
            next: AtomicU64::new(value),
        }
    }
}

impl Default for ManualTimestampSource {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl TimestampSource for ManualTimestampSource {
    fn now(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
