use crate::iov::IovKey;
use serde::{Deserialize, Serialize};

/// End-of-run bookkeeping handed to logging and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Tag of the analyzed conditions.
    pub tag: String,
    /// Number of validity intervals processed.
    pub iov_count: usize,
    /// Lifetime exposure accumulated over the run.
    pub total_exposure: f64,
    /// Last interval key processed, if any sample was seen.
    pub last_iov: Option<IovKey>,
}

impl RunSummary {
    /// Log the summary through the standard logger.
    pub fn log(&self) {
        match self.last_iov {
            Some(key) => log::info!(
                "run '{}' complete: {} IOVs, total exposure {:.6}, last interval {}",
                self.tag,
                self.iov_count,
                self.total_exposure,
                key
            ),
            None => log::info!("run '{}' complete: no samples processed", self.tag),
        }
    }
}
