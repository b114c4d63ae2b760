//! Run-scoped accumulation engine.
//!
//! One [`QualityEngine`] owns every piece of run state: the IOV change
//! detector, the luminosity ledger, the defect cache and the occupancy
//! grids. The driver constructs it once, feeds it exposure samples in
//! arrival order, and finalizes it exactly once at run end. There is no
//! hidden global state and no mid-run checkpointing.

use crate::cache::DefectCache;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::grid::{GridSet, NormalizationOutcome};
use crate::iov::{IovChangeDetector, IovKey};
use crate::luminosity::LuminosityLedger;
use crate::mapper::map_module;
use crate::record::ValidityRecordSource;
use crate::summary::RunSummary;
use serde::{Deserialize, Serialize};
use topology::TopologyLookup;

/// Phase of the accumulation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No sample seen yet.
    Idle,
    /// A defect snapshot is cached and exposure is accruing.
    Accumulating,
    /// Transient: draining the cache into the grids and refetching.
    Flushing,
}

/// One processing unit: an interval key plus an exposure delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureSample {
    /// Run number.
    pub run: u32,
    /// Sub-interval (luminosity block) within the run.
    pub block: u32,
    /// Nonnegative exposure recorded in this unit, in raw input units.
    pub exposure: f64,
}

impl ExposureSample {
    /// Interval key of this sample.
    pub fn key(&self) -> IovKey {
        IovKey::new(self.run, self.block)
    }
}

/// Result of finalizing a run: summary plus the normalized grids.
#[derive(Debug)]
pub struct FinalizeReport {
    /// End-of-run bookkeeping.
    pub summary: RunSummary,
    /// Occupancy grids, scaled to percent of total exposure unless the
    /// normalization was skipped.
    pub grids: GridSet,
    /// Whether the grids were scaled or kept raw.
    pub normalization: NormalizationOutcome,
}

/// Luminosity-weighted bad-component occupancy accumulator.
///
/// Generic over the validity-record source and the topology lookup so
/// tests can drive it with in-memory fixtures.
pub struct QualityEngine<S, T> {
    config: EngineConfig,
    state: EngineState,
    detector: IovChangeDetector,
    ledger: LuminosityLedger,
    cache: DefectCache,
    grids: GridSet,
    source: S,
    topology: T,
    iov_count: usize,
}

impl<S: ValidityRecordSource, T: TopologyLookup> QualityEngine<S, T> {
    /// Create an idle engine for one run.
    pub fn new(config: EngineConfig, source: S, topology: T) -> Self {
        Self {
            config,
            state: EngineState::Idle,
            detector: IovChangeDetector::new(),
            ledger: LuminosityLedger::new(),
            cache: DefectCache::new(),
            grids: GridSet::new(),
            source,
            topology,
            iov_count: 0,
        }
    }

    /// Current pipeline phase.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Number of validity intervals seen so far.
    pub fn iov_count(&self) -> usize {
        self.iov_count
    }

    /// Lifetime exposure accumulated so far.
    pub fn total_exposure(&self) -> f64 {
        self.ledger.total()
    }

    /// Process one exposure sample in arrival order.
    ///
    /// Transitions are keyed on the validity interval the sample falls in,
    /// not on the sample itself: consecutive blocks covered by the same
    /// record accrue exposure without a flush. On a transition the cached
    /// snapshot of the closing interval is mapped and filled with the
    /// since-reset exposure, the cache is refetched for the new interval,
    /// and the since-reset counter starts over. Samples past the configured
    /// run cut still resolve their interval but add no exposure.
    pub fn observe(&mut self, sample: ExposureSample) -> Result<()> {
        let since = self.source.active_since(sample.key())?;
        if self.detector.check(since) {
            self.flush_interval(since)?;
        }

        if !self.config.max_run.is_some_and(|max| sample.run > max) {
            self.ledger.add(sample.exposure * self.config.exposure_scale);
        }
        Ok(())
    }

    /// Close the interval that `since` opens: drain, map, fill, refetch.
    fn flush_interval(&mut self, since: IovKey) -> Result<()> {
        self.state = EngineState::Flushing;
        self.iov_count += 1;

        let weight = self.ledger.take_and_reset();
        log::info!(
            "new IOV at {since}: flushing {} cached modules with weight {weight:.6} (total {:.6})",
            self.cache.len(),
            self.ledger.total()
        );

        self.apply_cached_defects(weight)?;

        // One fetch per transition; a miss is fatal because the closing
        // weights of later intervals depend on this snapshot.
        let record = self.source.fetch(since)?;
        self.cache.replace(record);

        self.state = EngineState::Accumulating;
        Ok(())
    }

    /// Drain the cache and add `weight` to every mapped bin.
    fn apply_cached_defects(&mut self, weight: f64) -> Result<()> {
        for (module, mask) in self.cache.drain_for_flush() {
            let location = self.topology.locate(module)?;
            let bins = map_module(&location, mask);
            self.grids.accumulate(location.region(), &bins, weight)?;
        }
        Ok(())
    }

    /// Finalize the run: optionally flush the still-open interval, then
    /// normalize all grids and produce the run summary.
    ///
    /// The open interval is discarded by default, matching the historical
    /// behavior; `flush_at_finalize` closes it with its accrued exposure
    /// instead.
    pub fn finalize(mut self) -> Result<FinalizeReport> {
        if self.config.flush_at_finalize && !self.cache.is_empty() {
            let weight = self.ledger.take_and_reset();
            log::info!(
                "finalize: flushing open interval ({} modules, weight {weight:.6})",
                self.cache.len()
            );
            self.apply_cached_defects(weight)?;
        }

        let normalization = self.grids.normalize(self.ledger.total());

        let summary = RunSummary {
            tag: self.config.tag.clone(),
            iov_count: self.iov_count,
            total_exposure: self.ledger.total(),
            last_iov: self.detector.last(),
        };
        summary.log();

        Ok(FinalizeReport {
            summary,
            grids: self.grids,
            normalization,
        })
    }
}
