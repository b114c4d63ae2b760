//! Offline driver for the occupancy accumulation engine.
//!
//! Reads a topology table, a validity-record table and an ordered exposure
//! sample log, runs the single accumulation pass, and writes the
//! normalized occupancy grids plus the run summary as JSON.

use anyhow::{bail, Context};
use clap::Parser;
use occupancy::{export, EngineConfig, ExposureSample, IovRecordTable, QualityEngine};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use topology::TopologyTable;

/// Command line arguments for the occupancy report driver
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Accumulate luminosity-weighted bad-component occupancy grids"
)]
struct Args {
    /// Topology table JSON (module id -> layout position)
    #[arg(long)]
    topology: PathBuf,

    /// Validity-record table JSON (IOV start -> defect list)
    #[arg(long)]
    records: PathBuf,

    /// Exposure sample log, one JSON object per line, in processing order
    #[arg(long)]
    samples: PathBuf,

    /// Tag identifying the analyzed conditions
    #[arg(short, long, default_value = "")]
    tag: String,

    /// Highest run to accumulate exposure for
    #[arg(long)]
    max_run: Option<u32>,

    /// Scale factor applied to raw exposure deltas
    #[arg(long, default_value_t = 1.0)]
    exposure_scale: f64,

    /// Flush the interval still open at run end instead of discarding it
    #[arg(long)]
    flush_at_finalize: bool,

    /// Directory the report is written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let topology = TopologyTable::load_from_file(&args.topology)
        .with_context(|| format!("loading topology from {}", args.topology.display()))?;
    let records = IovRecordTable::load_from_file(&args.records)
        .with_context(|| format!("loading validity records from {}", args.records.display()))?;

    let config = EngineConfig {
        tag: args.tag,
        max_run: args.max_run,
        exposure_scale: args.exposure_scale,
        flush_at_finalize: args.flush_at_finalize,
    };
    let mut engine = QualityEngine::new(config, records, topology);

    let samples = File::open(&args.samples)
        .with_context(|| format!("opening sample log {}", args.samples.display()))?;
    for (line_no, line) in BufReader::new(samples).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sample: ExposureSample = serde_json::from_str(&line)
            .with_context(|| format!("parsing sample at line {}", line_no + 1))?;
        if sample.exposure < 0.0 {
            bail!("negative exposure delta at line {}", line_no + 1);
        }
        engine.observe(sample)?;
    }

    let report = engine.finalize()?;
    let path = export::write_report(&report, &args.out_dir)
        .with_context(|| format!("writing report under {}", args.out_dir.display()))?;

    println!(
        "{} IOVs, total exposure {:.6} -> {}",
        report.summary.iov_count,
        report.summary.total_exposure,
        path.display()
    );
    Ok(())
}
