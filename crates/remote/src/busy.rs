//! Busy tracking for the progress indicator.
//!
//! Calls overlap, so a plain boolean flickers; a counter goes busy on the
//! first outstanding call and idle only when the last one finishes. The
//! view should wait [`IDLE_DELAY_MS`] after the count reaches zero before
//! hiding the indicator, so back-to-back calls read as one busy period.

/// How long the count must stay at zero before the view reports idle.
pub const IDLE_DELAY_MS: u64 = 50;

#[derive(Debug, Default)]
pub struct BusyTracker {
    outstanding: usize,
}

impl BusyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.outstanding += 1;
    }

    pub fn end(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    pub fn is_busy(&self) -> bool {
        self.outstanding > 0
    }
}

#[cfg(test)]
mod tests {
    use super::BusyTracker;

    #[test]
    fn overlapping_calls_stay_busy_until_the_last_ends() {
        let mut busy = BusyTracker::new();
        assert!(!busy.is_busy());
        busy.begin();
        busy.begin();
        busy.end();
        assert!(busy.is_busy());
        busy.end();
        assert!(!busy.is_busy());
        // Spurious end must not underflow into permanently busy.
        busy.end();
        assert!(!busy.is_busy());
    }
}
