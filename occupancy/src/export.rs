//! JSON export of the finalized occupancy report.
//!
//! Rendering and image styling live outside this crate; the export is a
//! plain JSON dump of every region grid plus the run summary, suitable for
//! a downstream plotting layer.

use crate::engine::FinalizeReport;
use crate::grid::NormalizationOutcome;
use crate::summary::RunSummary;
use serde::Serialize;
use std::path::{Path, PathBuf};
use topology::Region;

/// One region grid as written to disk.
#[derive(Debug, Serialize)]
struct GridDump {
    region: Region,
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
    /// (x bins, y bins).
    shape: (usize, usize),
    /// Row-major rows, y ascending, each row x ascending.
    bins: Vec<Vec<f64>>,
}

/// Full report document.
#[derive(Debug, Serialize)]
struct ReportDump<'a> {
    summary: &'a RunSummary,
    /// False when normalization was skipped for zero total luminosity and
    /// the bins hold raw accumulated weights.
    normalized: bool,
    grids: Vec<GridDump>,
}

/// File name for a report with the given tag.
pub fn report_file_name(tag: &str) -> String {
    if tag.is_empty() {
        "occupancy.json".to_string()
    } else {
        format!("occupancy_{tag}.json")
    }
}

/// Write the finalized report as pretty-printed JSON under `dir`.
///
/// Returns the path of the written file.
pub fn write_report(report: &FinalizeReport, dir: &Path) -> Result<PathBuf, std::io::Error> {
    let grids = report
        .grids
        .iter()
        .map(|(region, grid)| GridDump {
            region: *region,
            x_bounds: region.x_bounds(),
            y_bounds: region.y_bounds(),
            shape: region.bin_shape(),
            bins: grid
                .bins()
                .outer_iter()
                .map(|row| row.to_vec())
                .collect(),
        })
        .collect();

    let dump = ReportDump {
        summary: &report.summary,
        normalized: matches!(report.normalization, NormalizationOutcome::Scaled { .. }),
        grids,
    };

    let path = dir.join(report_file_name(&report.summary.tag));
    let json = serde_json::to_string_pretty(&dump)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(&path, json)?;
    log::info!("wrote occupancy report to {}", path.display());
    Ok(path)
}
