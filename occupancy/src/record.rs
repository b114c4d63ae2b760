//! Validity-record access.
//!
//! A validity record lists the defect masks of all flagged modules for
//! exactly one interval of validity. The engine fetches a record exactly
//! once per detected IOV transition; a fetch failure is fatal because bin
//! contents are computed retroactively from the cached record and cannot be
//! reconstructed once it is missing.

use crate::iov::IovKey;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use topology::{DefectMask, ModuleId};

/// One module's defect mask within a validity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDefect {
    /// Module the mask applies to.
    pub module: ModuleId,
    /// Flagged-bad ROCs of that module.
    pub mask: DefectMask,
}

/// Failure to supply a validity record for an interval.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no validity record available for IOV {key}")]
pub struct FetchError {
    /// Interval the fetch was for.
    pub key: IovKey,
}

/// Supplies the validity record active at a given IOV key.
pub trait ValidityRecordSource {
    /// Key the interval containing `key` opens at, without the record body.
    ///
    /// Called on every sample to detect transitions: two samples covered by
    /// the same record resolve to the same since key. Must be cheap.
    fn active_since(&self, key: IovKey) -> Result<IovKey, FetchError>;

    /// Fetch the record for the interval containing `key`.
    ///
    /// Invoked exactly once per detected transition. Must complete before
    /// the new interval's samples are processed.
    fn fetch(&mut self, key: IovKey) -> Result<Vec<ModuleDefect>, FetchError>;
}

/// One serialized validity record with the key its interval opens at.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordEntry {
    since: IovKey,
    defects: Vec<ModuleDefect>,
}

/// Record source backed by an ordered list of (since-key, record) entries.
///
/// A fetch returns the record of the newest entry whose `since` key is at
/// or before the requested key; asking for a key before the first entry is
/// a fetch failure.
#[derive(Debug, Clone, Default)]
pub struct IovRecordTable {
    entries: Vec<RecordEntry>,
}

impl IovRecordTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record whose interval opens at `since`. Keeps entries sorted.
    pub fn push(&mut self, since: IovKey, defects: Vec<ModuleDefect>) {
        self.entries.push(RecordEntry { since, defects });
        self.entries.sort_by_key(|e| e.since);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest entry whose interval covers `key`, if any.
    fn covering_entry(&self, key: IovKey) -> Option<&RecordEntry> {
        self.entries.iter().rev().find(|e| e.since <= key)
    }

    /// Load a table from a JSON file containing a list of records.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        let mut entries: Vec<RecordEntry> = serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        entries.sort_by_key(|e| e.since);
        Ok(Self { entries })
    }
}

impl ValidityRecordSource for IovRecordTable {
    fn active_since(&self, key: IovKey) -> Result<IovKey, FetchError> {
        self.covering_entry(key).map(|e| e.since).ok_or(FetchError { key })
    }

    fn fetch(&mut self, key: IovKey) -> Result<Vec<ModuleDefect>, FetchError> {
        self.covering_entry(key)
            .map(|e| e.defects.clone())
            .ok_or(FetchError { key })
    }
}
