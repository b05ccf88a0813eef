//! Wall-clock sources for refractory gating and alarm timers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for replays and tests.
///
/// Clones share the same time, so a handle kept outside a controller can
/// move the controller's clock forward. Resolution is one nanosecond.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_ns: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ns: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Instant the clock started at
    #[must_use]
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Time elapsed since the origin
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_ns.load(Ordering::SeqCst))
    }

    /// Whole milliseconds elapsed since the origin
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.offset_ns.load(Ordering::SeqCst) / NANOS_PER_MILLI
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let ns = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_ns
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| Some(cur.saturating_add(ns)))
            .ok();
    }

    /// Move the clock to an absolute offset; earlier offsets are ignored
    pub fn set_elapsed_ms(&self, ms: u64) {
        self.offset_ns.fetch_max(ms.saturating_mul(NANOS_PER_MILLI), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}
