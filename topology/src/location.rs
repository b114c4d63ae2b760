//! Barrel and forward module coordinates and the region catalogue.
//!
//! Signed coordinates follow the detector convention: the sign of a ladder,
//! module, blade or disk number encodes which detector half the component
//! sits in, and zero is not a valid value for any of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ladder counts for barrel layers 1..=4.
pub const BARREL_LADDER_COUNTS: [i32; 4] = [6, 14, 22, 32];

/// Blade counts for forward rings 1..=2.
pub const FORWARD_BLADE_COUNTS: [i32; 2] = [11, 17];

/// Position of a barrel module within its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrelLocation {
    /// Layer number, 1..=4.
    pub layer: u8,
    /// Signed ladder number, never zero.
    pub ladder: i32,
    /// Signed module position along the ladder, never zero.
    pub module: i32,
    /// Whether the module sits on an outer ladder (flip hint).
    pub outer_ladder: bool,
}

/// Position of a forward module within its ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardLocation {
    /// Ring number, 1..=2.
    pub ring: u8,
    /// Signed blade number, never zero.
    pub blade: i32,
    /// Panel on the blade, 1 or 2.
    pub panel: u8,
    /// Signed disk number, never zero.
    pub disk: i32,
}

/// A coordinate set that violates the layout conventions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    /// Barrel layer outside 1..=4.
    #[error("barrel layer {0} outside 1..=4")]
    BarrelLayer(u8),
    /// Forward ring outside 1..=2.
    #[error("forward ring {0} outside 1..=2")]
    ForwardRing(u8),
    /// Panel outside 1..=2.
    #[error("panel {0} outside 1..=2")]
    Panel(u8),
    /// A signed coordinate was zero.
    #[error("{0} must be a nonzero signed coordinate")]
    ZeroCoordinate(&'static str),
}

/// Resolved place of a module in the detector layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "region", rename_all = "snake_case")]
pub enum ModuleLocation {
    Barrel(BarrelLocation),
    Forward(ForwardLocation),
}

impl ModuleLocation {
    /// Region the module contributes occupancy to.
    pub fn region(&self) -> Region {
        match self {
            ModuleLocation::Barrel(b) => Region::BarrelLayer(b.layer),
            ModuleLocation::Forward(f) => Region::ForwardRing(f.ring),
        }
    }

    /// Check the coordinates against the layout conventions.
    ///
    /// Bin mapping indexes the per-layer and per-ring count tables by layer
    /// and ring number; locations must pass here before they are mapped.
    pub fn validate(&self) -> Result<(), LocationError> {
        match self {
            ModuleLocation::Barrel(b) => {
                if !(1..=4).contains(&b.layer) {
                    return Err(LocationError::BarrelLayer(b.layer));
                }
                if b.ladder == 0 {
                    return Err(LocationError::ZeroCoordinate("ladder"));
                }
                if b.module == 0 {
                    return Err(LocationError::ZeroCoordinate("module"));
                }
                Ok(())
            }
            ModuleLocation::Forward(f) => {
                if !(1..=2).contains(&f.ring) {
                    return Err(LocationError::ForwardRing(f.ring));
                }
                if !(1..=2).contains(&f.panel) {
                    return Err(LocationError::Panel(f.panel));
                }
                if f.blade == 0 {
                    return Err(LocationError::ZeroCoordinate("blade"));
                }
                if f.disk == 0 {
                    return Err(LocationError::ZeroCoordinate("disk"));
                }
                Ok(())
            }
        }
    }
}

/// One occupancy region: a barrel layer or a forward ring.
///
/// Each region owns one fixed-size 2D bin grid whose shape and axis bounds
/// are determined here and never change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Barrel layer, 1..=4.
    BarrelLayer(u8),
    /// Forward ring, 1..=2.
    ForwardRing(u8),
}

impl Region {
    /// All regions, barrel layers first.
    pub fn all() -> Vec<Region> {
        let mut regions: Vec<Region> = (1..=4).map(Region::BarrelLayer).collect();
        regions.extend((1..=2).map(Region::ForwardRing));
        regions
    }

    /// Grid shape as (x bins, y bins).
    ///
    /// Barrel layer with ladder count `n`: 72 x (4n + 2). Forward ring 1:
    /// 56 x 92; ring 2: 56 x 140.
    pub fn bin_shape(&self) -> (usize, usize) {
        match self {
            Region::BarrelLayer(layer) => {
                let nlad = BARREL_LADDER_COUNTS[(*layer as usize) - 1];
                (72, (4 * nlad + 2) as usize)
            }
            Region::ForwardRing(ring) => {
                let nblade = FORWARD_BLADE_COUNTS[(*ring as usize) - 1];
                (56, (4 * (2 * nblade + 1)) as usize)
            }
        }
    }

    /// X axis bounds in layout coordinates.
    pub fn x_bounds(&self) -> (f64, f64) {
        match self {
            Region::BarrelLayer(_) => (-4.5, 4.5),
            Region::ForwardRing(_) => (-3.5, 3.5),
        }
    }

    /// Y axis bounds in layout coordinates.
    pub fn y_bounds(&self) -> (f64, f64) {
        match self {
            Region::BarrelLayer(layer) => {
                let nlad = BARREL_LADDER_COUNTS[(*layer as usize) - 1] as f64;
                (-nlad - 0.5, nlad + 0.5)
            }
            Region::ForwardRing(1) => (-11.5, 11.5),
            Region::ForwardRing(_) => (-17.5, 17.5),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::BarrelLayer(layer) => write!(f, "barrel_layer_{layer}"),
            Region::ForwardRing(ring) => write!(f, "forward_ring_{ring}"),
        }
    }
}
