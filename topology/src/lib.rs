//! Detector topology model shared by the occupancy accumulation pipeline.
//!
//! This crate contains the pure geometry side of the system: module
//! identifiers, per-module readout-chip defect masks, the barrel/forward
//! coordinate types, and the lookup that resolves a module identifier into
//! its place in the detector layout.

pub mod location;
pub mod lookup;
pub mod module;

pub use location::{
    BarrelLocation, ForwardLocation, LocationError, ModuleLocation, Region, BARREL_LADDER_COUNTS,
    FORWARD_BLADE_COUNTS,
};
pub use lookup::{TopologyError, TopologyLookup, TopologyTable};
pub use module::{DefectMask, ModuleId};
