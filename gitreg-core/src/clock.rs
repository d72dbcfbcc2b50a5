//! Tick sources.
//!
//! The host never reads wall-clock time directly; it asks an injected
//! [`TickSource`]. Tests and the operator CLI drive a [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::types::Tick;

pub trait TickSource: Send + Sync {
    fn current_tick(&self) -> Tick;
}

/// A counter advanced explicitly by its owner.
#[derive(Debug, Default)]
pub struct ManualClock {
    tick: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Tick) -> Self {
        Self { tick: AtomicU64::new(start) }
    }

    pub fn advance(&self, ticks: Tick) -> Tick {
        self.tick.fetch_add(ticks, Ordering::SeqCst) + ticks
    }

    pub fn set(&self, tick: Tick) {
        self.tick.store(tick, Ordering::SeqCst);
    }
}

impl TickSource for ManualClock {
    fn current_tick(&self) -> Tick {
        self.tick.load(Ordering::SeqCst)
    }
}

/// Seconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct EpochClock;

impl TickSource for EpochClock {
    fn current_tick(&self) -> Tick {
        Utc::now().timestamp().max(0) as Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(5);
        assert_eq!(clock.current_tick(), 5);
        assert_eq!(clock.advance(10), 15);
        assert_eq!(clock.current_tick(), 15);
        clock.set(3);
        assert_eq!(clock.current_tick(), 3);
    }

    #[test]
    fn epoch_clock_is_monotonic_enough() {
        let first = EpochClock.current_tick();
        let second = EpochClock.current_tick();
        assert!(second >= first);
        assert!(first > 1_600_000_000);
    }
}
