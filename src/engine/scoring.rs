//! Risk aggregation: weighted severity score in [0, 100] and the depleting
//! risk budget.

use crate::core::config::SentinelConfig;
use crate::engine::types::{DriftReport, FeatureId, Severity};

/// Budget value restored on construction and recalibration.
pub const FULL_BUDGET: f64 = 100.0;

/// Aggregates per-feature test outcomes into one bounded score and owns the
/// risk budget.
///
/// The budget is monotone non-increasing between resets: evaluations with a
/// score above the drift-presence threshold burn `score / divisor` points,
/// clean evaluations leave it untouched, and only `reset_budget` (called by
/// recalibration) restores it.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    drift_presence_threshold: f64,
    budget_decrement_divisor: f64,
    budget: f64,
}

impl RiskScorer {
    /// Scorer with a full budget.
    #[must_use]
    pub fn new(config: &SentinelConfig) -> Self {
        Self {
            drift_presence_threshold: config.drift_presence_threshold,
            budget_decrement_divisor: config.budget_decrement_divisor,
            budget: FULL_BUDGET,
        }
    }

    /// Weighted severity aggregation, normalized so the worst case (every
    /// feature Severe) maps to exactly 100. Deterministic.
    #[must_use]
    pub fn score(report: &DriftReport) -> f64 {
        let weighted: f64 = report
            .iter()
            .map(|(feature, result)| feature.weight() * result.severity.magnitude())
            .sum();
        100.0 * weighted / Severity::MAX_MAGNITUDE
    }

    /// Per-feature contribution to the aggregate score, same formula as
    /// [`Self::score`] so attribution and scoring cannot disagree.
    #[must_use]
    pub fn contribution(feature: FeatureId, severity: Severity) -> f64 {
        100.0 * feature.weight() * severity.magnitude() / Severity::MAX_MAGNITUDE
    }

    /// Burn budget for one evaluation. Scores at or below the presence
    /// threshold leave the budget unchanged; transient clean reads never
    /// regenerate it.
    pub fn consume_budget(&mut self, score: f64) {
        if score > self.drift_presence_threshold {
            self.budget = (self.budget - score / self.budget_decrement_divisor).max(0.0);
        }
    }

    /// Restore the full budget. Recalibration is the only caller.
    pub fn reset_budget(&mut self) {
        self.budget = FULL_BUDGET;
    }

    /// Remaining budget.
    #[must_use]
    pub const fn budget(&self) -> f64 {
        self.budget
    }
}
