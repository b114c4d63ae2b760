use crate::record::FetchError;
use thiserror::Error;
use topology::{Region, TopologyError};

/// Errors produced by the occupancy accumulation engine.
///
/// Everything here aborts the run: the pipeline is a single deterministic
/// pass over an ordered input log, and a flush computed from a wrong or
/// missing record cannot be repaired afterwards. The one recoverable
/// condition, zero total luminosity at normalization, is reported through
/// [`crate::grid::NormalizationOutcome`] instead of an error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A module id resolves to no valid layout position: unknown
    /// subdetector, or stored coordinates outside the layout conventions.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// The validity-record source could not supply a snapshot.
    #[error(transparent)]
    ValidityFetch(#[from] FetchError),

    /// A mapped bin fell outside its region's grid. Signals a
    /// geometry-convention defect, never clamped.
    #[error("bin ({x}, {y}) outside grid for {region}")]
    OutOfRangeGeometryCoordinate {
        /// Region whose grid rejected the bin.
        region: Region,
        /// X bin index as mapped.
        x: i32,
        /// Y bin index as mapped.
        y: i32,
    },
}

/// Standard Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
