//! Luminosity-weighted bad-component occupancy accumulation.
//!
//! Accumulates, per detector module, the fraction of recorded exposure
//! during which the module's readout chips were flagged defective, and
//! expresses it as normalized occupancy grids indexed by detector-layout
//! coordinates.
//!
//! The pipeline is a single sequential pass over exposure samples. Each
//! sample carries an interval-of-validity (IOV) key and an exposure delta;
//! when the key changes, the defect snapshot cached for the closing
//! interval is mapped to grid bins and filled with the exposure accrued
//! since the previous transition. At run end a one-shot normalization
//! scales every bin to a percentage of total exposure.
//!
//! States: `Idle` -> `Flushing` (first sample primes the cache) ->
//! `Accumulating`, with `Accumulating -> Flushing` on every later IOV
//! transition.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod grid;
pub mod iov;
pub mod luminosity;
pub mod mapper;
pub mod record;
pub mod summary;

pub use cache::DefectCache;
pub use config::EngineConfig;
pub use engine::{EngineState, ExposureSample, FinalizeReport, QualityEngine};
pub use error::{EngineError, Result};
pub use grid::{GridBin, GridSet, NormalizationOutcome, OccupancyGrid};
pub use iov::{IovChangeDetector, IovKey};
pub use luminosity::LuminosityLedger;
pub use record::{FetchError, IovRecordTable, ModuleDefect, ValidityRecordSource};
pub use summary::RunSummary;
