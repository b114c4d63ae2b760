//! Interval-of-validity keys and transition detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key identifying one validity interval, ordered by (run, block).
///
/// Processing order is assumed non-decreasing in this key; the engine does
/// not verify it independently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IovKey {
    /// Run number.
    pub run: u32,
    /// Sub-interval (luminosity block) within the run.
    pub block: u32,
}

impl IovKey {
    /// Build a key from run and block numbers.
    pub fn new(run: u32, block: u32) -> Self {
        IovKey { run, block }
    }
}

impl fmt::Display for IovKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.run, self.block)
    }
}

/// Detects transitions between validity intervals.
///
/// The first key ever checked always reports a transition so the engine can
/// prime its defect cache. Checking commits the key as last-seen; there are
/// no other side effects.
#[derive(Debug, Default)]
pub struct IovChangeDetector {
    last: Option<IovKey>,
}

impl IovChangeDetector {
    /// Create a detector that has seen no key yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` differs from the last key accepted. Commits `key`.
    pub fn check(&mut self, key: IovKey) -> bool {
        let changed = self.last != Some(key);
        self.last = Some(key);
        changed
    }

    /// Last key accepted, if any.
    pub fn last(&self) -> Option<IovKey> {
        self.last
    }
}
