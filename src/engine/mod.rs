//! The drift detection and risk scoring engine.
//!
//! Composes the baseline store, per-feature KS tester, risk scorer, entropy
//! monitor, attribution tracker, and fingerprint generator behind the four
//! operations the service layer calls: evaluate, explain, fingerprint, and
//! recalibrate. The engine owns the risk budget and attribution history;
//! callers serialize access through a single mutex (see `service`).

pub mod attribution;
pub mod baseline;
pub mod entropy;
pub mod fingerprint;
pub mod kstest;
pub mod scoring;
pub mod types;

use serde::Serialize;

use crate::core::config::SentinelConfig;
use crate::core::errors::Result;
use crate::engine::attribution::{Attribution, AttributionTracker};
use crate::engine::baseline::BaselineStore;
use crate::engine::entropy::EntropyReading;
use crate::engine::kstest::FeatureDriftTester;
use crate::engine::scoring::RiskScorer;
use crate::engine::types::{Batch, DriftReport, FeatureId};

/// Everything one evaluation returns.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Per-feature test outcomes, one entry per monitored feature.
    pub report: DriftReport,
    /// Aggregate risk score in [0, 100].
    pub score: f64,
    /// Risk budget remaining after this evaluation.
    pub budget: f64,
}

/// Stateful drift engine. One instance per monitored stream.
#[derive(Debug)]
pub struct DriftEngine {
    config: SentinelConfig,
    baseline: BaselineStore,
    tester: FeatureDriftTester,
    scorer: RiskScorer,
    tracker: AttributionTracker,
}

impl DriftEngine {
    /// Build an engine with its initial baseline taken from
    /// `reference_batch`.
    pub fn new(reference_batch: &Batch, config: SentinelConfig) -> Result<Self> {
        config.validate()?;
        let baseline = BaselineStore::from_batch(reference_batch)?;
        let tester = FeatureDriftTester::new(config.significance_level);
        let scorer = RiskScorer::new(&config);
        let tracker = AttributionTracker::new(config.attribution_history_cap);
        Ok(Self {
            config,
            baseline,
            tester,
            scorer,
            tracker,
        })
    }

    /// Test every monitored feature against the baseline, score the result,
    /// and burn budget. The single state-advancing call: run it exactly once
    /// per logical batch.
    ///
    /// Errors abort before any budget mutation, so an undersized batch
    /// consumes nothing.
    pub fn evaluate(&mut self, batch: &Batch) -> Result<Evaluation> {
        let report = self.test_all(batch)?;
        let score = RiskScorer::score(&report);
        self.scorer.consume_budget(score);
        Ok(Evaluation {
            report,
            score,
            budget: self.scorer.budget(),
        })
    }

    /// Rank features by drift contribution for this batch and append the top
    /// contributor to the rolling history.
    pub fn explain(&mut self, batch: &Batch) -> Result<Attribution> {
        let report = self.test_all(batch)?;
        self.tracker.attribute(&report)
    }

    /// Classify the batch's pooled confidence dispersion. Pure; no state
    /// advances.
    #[must_use]
    pub fn check_entropy(&self, batch: &Batch) -> EntropyReading {
        entropy::check(batch, &self.config)
    }

    /// Stable identifier for the report's drifting-feature set.
    #[must_use]
    pub fn fingerprint(report: &DriftReport) -> String {
        fingerprint::fingerprint(report)
    }

    /// Replace the baseline with `batch` and restore the full risk budget.
    /// The only way the budget increases. On error both baseline and budget
    /// are left untouched.
    pub fn recalibrate(&mut self, batch: &Batch) -> Result<()> {
        self.baseline.recalibrate(batch)?;
        self.scorer.reset_budget();
        Ok(())
    }

    /// Remaining risk budget.
    #[must_use]
    pub const fn budget(&self) -> f64 {
        self.scorer.budget()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SentinelConfig {
        &self.config
    }

    fn test_all(&self, batch: &Batch) -> Result<DriftReport> {
        let mut entries = Vec::with_capacity(FeatureId::ALL.len());
        for feature in FeatureId::ALL {
            let current = batch.column(feature);
            let result = self.tester.test(
                feature,
                self.baseline.reference(feature),
                self.baseline.stats(feature),
                &current,
            )?;
            entries.push((feature, result));
        }
        Ok(DriftReport::new(entries))
    }
}
