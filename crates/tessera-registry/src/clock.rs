//! Ledger time as a port.
//!
//! The registry never reads the wall clock directly; everything time-shaped
//! (cooldowns, issuance stamps) goes through [`ChainClock`] so tests can
//! drive ticks by hand.

use std::sync::atomic::{AtomicU64, Ordering};

use tessera_common::Tick;

/// Monotonically non-decreasing ledger time.
pub trait ChainClock: Send + Sync {
    fn now(&self) -> Tick;
}

/// Wall-clock seconds since the Unix epoch.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ChainClock for SystemClock {
    fn now(&self) -> Tick {
        // Pre-epoch clocks read as tick 0 rather than going backwards.
        chrono::Utc::now().timestamp().max(0) as Tick
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    tick: AtomicU64,
}

impl ManualClock {
    pub fn starting_at(tick: Tick) -> Self {
        Self {
            tick: AtomicU64::new(tick),
        }
    }

    pub fn advance(&self, ticks: Tick) {
        self.tick.fetch_add(ticks, Ordering::SeqCst);
    }

    pub fn set(&self, tick: Tick) {
        self.tick.store(tick, Ordering::SeqCst);
    }
}

impl ChainClock for ManualClock {
    fn now(&self) -> Tick {
        self.tick.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::starting_at(10);
        assert_eq!(clock.now(), 10);
        clock.advance(8);
        assert_eq!(clock.now(), 18);
        clock.set(100);
        assert_eq!(clock.now(), 100);
    }
}
