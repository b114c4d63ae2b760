use serde::{Deserialize, Serialize};

/// Configuration for one accumulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Free-text tag identifying the analyzed conditions; carried into the
    /// run summary and export names.
    pub tag: String,
    /// Highest run to accumulate exposure for. Samples beyond it still
    /// close the open interval but contribute no exposure.
    pub max_run: Option<u32>,
    /// Scale factor applied to every raw exposure delta (unit conversion).
    pub exposure_scale: f64,
    /// Whether the interval still open at finalize is flushed with its
    /// accrued exposure. Off by default: the historical behavior discards
    /// the final interval's contribution.
    pub flush_at_finalize: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tag: String::new(),
            max_run: None,
            exposure_scale: 1.0,
            flush_at_finalize: false,
        }
    }
}
