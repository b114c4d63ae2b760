//! Module-id to layout-position resolution.
//!
//! The accumulation engine never interprets raw module ids itself; it asks a
//! [`TopologyLookup`] for the module's place in the layout. The lookup is
//! pure and deterministic: the same id always resolves to the same location.

use crate::location::{LocationError, ModuleLocation};
use crate::module::ModuleId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors produced while resolving module ids.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    /// The id maps to neither the barrel nor the forward detector.
    #[error("module {0} maps to no known subdetector")]
    UnknownSubdetector(ModuleId),

    /// The id maps to coordinates outside the layout conventions.
    #[error("module {module}: {source}")]
    InvalidLocation {
        /// Module whose stored location is malformed.
        module: ModuleId,
        #[source]
        source: LocationError,
    },
}

/// Resolves a module id into its place in the detector layout.
pub trait TopologyLookup {
    /// Locate a module, or fail if the id belongs to no known subdetector
    /// or its stored coordinates violate the layout conventions.
    fn locate(&self, id: ModuleId) -> Result<ModuleLocation, TopologyError>;
}

/// One row of a serialized topology table. The location sits under its own
/// key so both it and the module id serialize without field clashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TopologyEntry {
    module: ModuleId,
    location: ModuleLocation,
}

/// In-memory topology table, loadable from JSON.
///
/// The table holds one location per module id; duplicate inserts replace the
/// earlier entry.
#[derive(Debug, Clone, Default)]
pub struct TopologyTable {
    entries: HashMap<ModuleId, ModuleLocation>,
}

impl TopologyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a module's location.
    pub fn insert(&mut self, id: ModuleId, location: ModuleLocation) {
        self.entries.insert(id, location);
    }

    /// Number of known modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a table from a JSON file containing a list of entries.
    ///
    /// Entries with coordinates outside the layout conventions are rejected
    /// here rather than surfacing later during bin mapping.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        let entries: Vec<TopologyEntry> = serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut table = Self::new();
        for entry in entries {
            entry.location.validate().map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("module {}: {e}", entry.module),
                )
            })?;
            table.insert(entry.module, entry.location);
        }
        Ok(table)
    }

    /// Save the table as a JSON list of entries.
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let mut entries: Vec<TopologyEntry> = self
            .entries
            .iter()
            .map(|(module, location)| TopologyEntry {
                module: *module,
                location: *location,
            })
            .collect();
        entries.sort_by_key(|e| e.module);
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

impl TopologyLookup for TopologyTable {
    fn locate(&self, id: ModuleId) -> Result<ModuleLocation, TopologyError> {
        let location = self
            .entries
            .get(&id)
            .copied()
            .ok_or(TopologyError::UnknownSubdetector(id))?;
        location
            .validate()
            .map_err(|source| TopologyError::InvalidLocation { module: id, source })?;
        Ok(location)
    }
}
