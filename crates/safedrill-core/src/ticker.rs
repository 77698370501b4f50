//! Clock sources and the ticker that turns them into elapsed-time samples.
//!
//! The engine only understands `tick(elapsed_ms)`. A [`Ticker`] measures
//! that elapsed time against a [`TimeSource`] while the drill is running and
//! forgets its anchor while paused, so paused wall time is never counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Reference tick cadence.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

pub trait TimeSource {
    /// Monotone-ish milliseconds; only differences matter.
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Produces elapsed-ms deltas between successive samples.
#[derive(Debug, Clone)]
pub struct Ticker<C: TimeSource = SystemClock> {
    clock: C,
    last_ms: Option<u64>,
}

impl<C: TimeSource> Ticker<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_ms: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Anchor at the current time. Call when the drill starts running.
    pub fn resume(&mut self) {
        self.last_ms = Some(self.clock.now_ms());
    }

    /// Drop the anchor. Call when the drill stops running.
    pub fn halt(&mut self) {
        self.last_ms = None;
    }

    /// Elapsed time since the previous sample, or `None` while halted.
    pub fn sample(&mut self) -> Option<u64> {
        let last = self.last_ms?;
        let now = self.clock.now_ms();
        self.last_ms = Some(now);
        Some(now.saturating_sub(last))
    }
}

impl Default for Ticker<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}
