//! Running exposure totals.

/// Running exposure counters for one run.
///
/// `total` accumulates for the lifetime of the run and feeds the final
/// normalization; `since_reset` accumulates between IOV transitions and is
/// consumed as the flush weight. Deltas must be nonnegative.
#[derive(Debug, Default)]
pub struct LuminosityLedger {
    total: f64,
    since_reset: f64,
}

impl LuminosityLedger {
    /// Create a ledger with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one exposure delta to both counters. `delta` must be >= 0.
    pub fn add(&mut self, delta: f64) {
        debug_assert!(delta >= 0.0, "exposure delta must be nonnegative");
        self.total += delta;
        self.since_reset += delta;
    }

    /// Take the since-reset exposure and zero it.
    ///
    /// Called exactly once per flush; the returned value is the weight of
    /// the interval that just closed.
    pub fn take_and_reset(&mut self) -> f64 {
        std::mem::take(&mut self.since_reset)
    }

    /// Lifetime exposure, never reset.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Exposure accrued since the last flush.
    pub fn since_reset(&self) -> f64 {
        self.since_reset
    }
}
