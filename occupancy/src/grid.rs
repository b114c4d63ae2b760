//! Fixed-shape occupancy bin grids, one per region.

use crate::error::{EngineError, Result};
use ndarray::Array2;
use std::collections::BTreeMap;
use topology::Region;

/// One bin coordinate produced by the geometry mapper.
///
/// Indices are 0-based grid positions. They are carried as `i32` so that a
/// mapping defect can surface as an out-of-range error at fill time instead
/// of wrapping silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridBin {
    /// X bin index (module / disk axis).
    pub x: i32,
    /// Y bin index (ladder / blade axis).
    pub y: i32,
}

/// Outcome of the one-shot normalization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizationOutcome {
    /// Every bin was scaled by `100 / total`.
    Scaled {
        /// Lifetime exposure the scaling used.
        total: f64,
    },
    /// Total exposure was zero; bins keep their raw accumulated weights.
    SkippedZeroLuminosity,
}

/// Fixed 2D bin array for one region.
///
/// Shape and axis bounds come from the region and never change. Bins only
/// grow until normalization; there is no decay and no clamping.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    region: Region,
    bins: Array2<f64>,
}

impl OccupancyGrid {
    /// Create a zeroed grid sized for `region`.
    pub fn new(region: Region) -> Self {
        let (nx, ny) = region.bin_shape();
        OccupancyGrid {
            region,
            bins: Array2::zeros((ny, nx)),
        }
    }

    /// Region this grid belongs to.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Add `weight` to every listed bin.
    ///
    /// An out-of-range coordinate aborts with the offending bin and leaves
    /// already-applied increments in place; the engine treats the error as
    /// fatal so the partially filled grid is never observed downstream.
    pub fn accumulate(&mut self, bins: &[GridBin], weight: f64) -> Result<()> {
        let (ny, nx) = self.bins.dim();
        for bin in bins {
            if bin.x < 0 || bin.y < 0 || bin.x as usize >= nx || bin.y as usize >= ny {
                return Err(EngineError::OutOfRangeGeometryCoordinate {
                    region: self.region,
                    x: bin.x,
                    y: bin.y,
                });
            }
            self.bins[[bin.y as usize, bin.x as usize]] += weight;
        }
        Ok(())
    }

    /// Scale every bin by `100 / total`; skipped when `total` is zero.
    pub fn normalize(&mut self, total: f64) -> NormalizationOutcome {
        if total == 0.0 {
            return NormalizationOutcome::SkippedZeroLuminosity;
        }
        self.bins.mapv_inplace(|v| v * 100.0 / total);
        NormalizationOutcome::Scaled { total }
    }

    /// Value of one bin. Out-of-range reads return zero.
    pub fn value(&self, x: usize, y: usize) -> f64 {
        let (ny, nx) = self.bins.dim();
        if x < nx && y < ny {
            self.bins[[y, x]]
        } else {
            0.0
        }
    }

    /// Sum over all bins.
    pub fn sum(&self) -> f64 {
        self.bins.sum()
    }

    /// Bin values in row-major (y, x) layout.
    pub fn bins(&self) -> &Array2<f64> {
        &self.bins
    }
}

/// All six region grids of one run: 4 barrel layers, 2 forward rings.
#[derive(Debug, Clone)]
pub struct GridSet {
    grids: BTreeMap<Region, OccupancyGrid>,
}

impl GridSet {
    /// Create zeroed grids for every region.
    pub fn new() -> Self {
        let grids = Region::all()
            .into_iter()
            .map(|region| (region, OccupancyGrid::new(region)))
            .collect();
        GridSet { grids }
    }

    /// Add `weight` to the listed bins of `region`'s grid.
    pub fn accumulate(&mut self, region: Region, bins: &[GridBin], weight: f64) -> Result<()> {
        match self.grids.get_mut(&region) {
            Some(grid) => grid.accumulate(bins, weight),
            // Regions are fixed at construction; a miss means the mapper
            // produced a layer or ring outside the layout.
            None => Err(EngineError::OutOfRangeGeometryCoordinate {
                region,
                x: bins.first().map_or(0, |b| b.x),
                y: bins.first().map_or(0, |b| b.y),
            }),
        }
    }

    /// Normalize every grid by the same lifetime total.
    pub fn normalize(&mut self, total: f64) -> NormalizationOutcome {
        if total == 0.0 {
            log::warn!("total luminosity is zero, skipping normalization");
            return NormalizationOutcome::SkippedZeroLuminosity;
        }
        for grid in self.grids.values_mut() {
            grid.normalize(total);
        }
        NormalizationOutcome::Scaled { total }
    }

    /// Grid for one region.
    pub fn grid(&self, region: Region) -> Option<&OccupancyGrid> {
        self.grids.get(&region)
    }

    /// Iterate over all grids in region order.
    pub fn iter(&self) -> impl Iterator<Item = (&Region, &OccupancyGrid)> {
        self.grids.iter()
    }
}

impl Default for GridSet {
    fn default() -> Self {
        Self::new()
    }
}
