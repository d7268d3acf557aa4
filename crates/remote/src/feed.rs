//! Live feed staleness detection.
//!
//! The feed sends a heartbeat even when no data changes, so silence longer
//! than [`STALE_AFTER_MS`] means the connection is effectively dead and the
//! view should warn and fall back to polling. The caller checks every
//! [`CHECK_INTERVAL_MS`] with its own clock; the monitor itself never sleeps.

use foundation::Clock;

/// Silence threshold before the feed counts as stale.
pub const STALE_AFTER_MS: i64 = 30_000;

/// Suggested cadence for `is_stale` checks.
pub const CHECK_INTERVAL_MS: i64 = 5_000;

#[derive(Debug, Default)]
pub struct StalenessMonitor {
    last_seen_ms: Option<i64>,
}

impl StalenessMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that any feed message arrived, heartbeat included.
    pub fn record<C: Clock>(&mut self, clock: &C) {
        self.last_seen_ms = Some(clock.now_ms());
    }

    /// Whether the feed has been silent for longer than the threshold.
    /// A feed that never delivered anything is not stale; it is still
    /// connecting.
    pub fn is_stale<C: Clock>(&self, clock: &C) -> bool {
        match self.last_seen_ms {
            Some(last) => clock.now_ms() - last > STALE_AFTER_MS,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::FixedClock;

    #[test]
    fn silence_past_threshold_is_stale() {
        let mut monitor = StalenessMonitor::new();
        assert!(!monitor.is_stale(&FixedClock(1_000_000)));

        monitor.record(&FixedClock(1_000_000));
        assert!(!monitor.is_stale(&FixedClock(1_000_000 + STALE_AFTER_MS)));
        assert!(monitor.is_stale(&FixedClock(1_000_000 + STALE_AFTER_MS + 1)));

        // A heartbeat resets the window.
        monitor.record(&FixedClock(1_000_000 + STALE_AFTER_MS + 1));
        assert!(!monitor.is_stale(&FixedClock(1_000_000 + STALE_AFTER_MS + 2)));
    }
}
