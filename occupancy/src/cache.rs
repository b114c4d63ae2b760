//! Per-interval defect snapshot.

use crate::record::ModuleDefect;
use std::collections::BTreeMap;
use topology::{DefectMask, ModuleId};

/// Snapshot of module defect masks for the currently open interval.
///
/// Holds at most one mask per module id. The snapshot is replaced
/// wholesale on every IOV transition, never merged; between transitions it
/// is the authoritative defect state for the whole open interval.
#[derive(Debug, Default)]
pub struct DefectCache {
    masks: BTreeMap<ModuleId, DefectMask>,
}

impl DefectCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the current snapshot and install `records` in its place.
    ///
    /// A module listed twice keeps the last mask seen, matching the
    /// one-mask-per-module invariant.
    pub fn replace(&mut self, records: impl IntoIterator<Item = ModuleDefect>) {
        self.masks.clear();
        for record in records {
            self.masks.insert(record.module, record.mask);
        }
    }

    /// Take the full snapshot for flushing and leave the cache empty.
    pub fn drain_for_flush(&mut self) -> BTreeMap<ModuleId, DefectMask> {
        std::mem::take(&mut self.masks)
    }

    /// Number of modules in the snapshot.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
