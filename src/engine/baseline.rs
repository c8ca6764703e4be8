//! Baseline store: the reference distribution per monitored feature.
//!
//! Recalibration builds the full replacement set first and swaps it in
//! wholesale, so a concurrent reader behind the engine mutex only ever sees
//! a pre- or post-calibration baseline, never a mixture.

use std::sync::OnceLock;

use crate::core::config::MIN_BASELINE_SAMPLES;
use crate::core::errors::{Result, SentinelError};
use crate::engine::types::{Batch, FeatureId};

/// Reference samples for one feature, with lazily cached moments.
#[derive(Debug)]
struct ReferenceSet {
    samples: Vec<f64>,
    // (mean, std), populated on first read after each recalibration.
    moments: OnceLock<(f64, f64)>,
}

impl ReferenceSet {
    fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            moments: OnceLock::new(),
        }
    }

    fn moments(&self) -> (f64, f64) {
        *self.moments.get_or_init(|| {
            let n = self.samples.len() as f64;
            let mean = self.samples.iter().sum::<f64>() / n;
            let variance = self
                .samples
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / n;
            (mean, variance.sqrt())
        })
    }
}

/// Owns the current reference distribution for every monitored feature.
#[derive(Debug)]
pub struct BaselineStore {
    // Indexed parallel to FeatureId::ALL.
    references: [ReferenceSet; 3],
}

impl BaselineStore {
    /// Build an initial baseline from a reference batch.
    pub fn from_batch(batch: &Batch) -> Result<Self> {
        let references = Self::extract(batch)?;
        Ok(Self { references })
    }

    /// Replace the stored reference set for every feature with the values
    /// observed in `batch`. On error the prior baseline is left untouched.
    pub fn recalibrate(&mut self, batch: &Batch) -> Result<()> {
        self.references = Self::extract(batch)?;
        Ok(())
    }

    fn extract(batch: &Batch) -> Result<[ReferenceSet; 3]> {
        if batch.is_empty() {
            return Err(SentinelError::InsufficientData {
                details: "calibration batch is empty".to_string(),
            });
        }
        if batch.len() < MIN_BASELINE_SAMPLES {
            return Err(SentinelError::InsufficientData {
                details: format!(
                    "calibration batch has {} records, need at least {MIN_BASELINE_SAMPLES}",
                    batch.len()
                ),
            });
        }
        Ok(FeatureId::ALL.map(|feature| ReferenceSet::new(batch.column(feature))))
    }

    /// Current reference sample sequence for `feature`.
    #[must_use]
    pub fn reference(&self, feature: FeatureId) -> &[f64] {
        &self.index(feature).samples
    }

    /// Look up a reference set by wire name, for callers speaking column
    /// names rather than typed features.
    pub fn reference_by_name(&self, name: &str) -> Result<&[f64]> {
        let feature = FeatureId::from_wire(name).ok_or_else(|| SentinelError::UnknownFeature {
            name: name.to_string(),
        })?;
        Ok(self.reference(feature))
    }

    /// Cached (mean, std) of the reference samples, computed on first use
    /// after each recalibration.
    #[must_use]
    pub fn stats(&self, feature: FeatureId) -> (f64, f64) {
        self.index(feature).moments()
    }

    fn index(&self, feature: FeatureId) -> &ReferenceSet {
        let position = FeatureId::ALL
            .iter()
            .position(|f| *f == feature)
            .unwrap_or_default();
        &self.references[position]
    }
}
