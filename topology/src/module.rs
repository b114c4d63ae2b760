//! Module identifiers and readout-chip defect masks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of one detector module.
///
/// The raw value is assigned by the detector description and carries no
/// structure of its own here; it is only meaningful as a key into a
/// [`crate::TopologyLookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub u32);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of flagged-bad readout chips (ROCs) for one module.
///
/// Bit `i` set means ROC `i` of the module is flagged defective. A module
/// carries at most 16 ROCs, so the full set fits in one `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefectMask(pub u16);

impl DefectMask {
    /// Number of ROC slots tracked per module.
    pub const ROCS_PER_MODULE: u8 = 16;

    /// Mask with no flagged chips.
    pub fn empty() -> Self {
        DefectMask(0)
    }

    /// Whether no chip is flagged.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of flagged chips.
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Whether ROC `idx` is flagged. Indices outside 0..16 are never set.
    pub fn is_set(&self, idx: u8) -> bool {
        idx < Self::ROCS_PER_MODULE && (self.0 >> idx) & 1 == 1
    }

    /// Iterate over the indices of flagged chips, ascending.
    pub fn set_bits(&self) -> impl Iterator<Item = u8> + '_ {
        let bits = self.0;
        (0..Self::ROCS_PER_MODULE).filter(move |idx| (bits >> idx) & 1 == 1)
    }
}

impl fmt::Display for DefectMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<u16> for DefectMask {
    fn from(bits: u16) -> Self {
        DefectMask(bits)
    }
}
