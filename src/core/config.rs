//! Sentinel configuration: every tuning knob is a named field with a
//! documented default, overridable from TOML so tests and operators can
//! adjust thresholds without touching engine logic.

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SentinelError};

/// Minimum reference samples per feature for a usable baseline.
pub const MIN_BASELINE_SAMPLES: usize = 10;

/// Minimum current-batch samples for a statistically meaningful KS test.
pub const MIN_TEST_SAMPLES: usize = 2;

/// All sentinel thresholds and caps.
///
/// Defaults mirror production operation; tests override individual fields
/// via struct update syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentinelConfig {
    /// Significance level for the two-sample KS test. A feature drifts when
    /// its p-value falls below this. 0.05 bounds the per-feature false
    /// positive rate at 5%.
    pub significance_level: f64,
    /// Scores at or below this are treated as drift-free and leave the risk
    /// budget untouched.
    pub drift_presence_threshold: f64,
    /// Budget decrement is `score / budget_decrement_divisor` per drifting
    /// evaluation. 10.0 means a lockdown-level score (100) burns ten points
    /// per check.
    pub budget_decrement_divisor: f64,
    /// Upper bound of the Low risk band.
    pub low_band_max: f64,
    /// Upper bound of the Medium risk band.
    pub medium_band_max: f64,
    /// Upper bound of the High risk band; above is Critical.
    pub high_band_max: f64,
    /// Maximum retained attribution records (FIFO eviction past this).
    pub attribution_history_cap: usize,
    /// Maximum retained black-box audit entries, newest first.
    pub audit_log_cap: usize,
    /// Consecutive drifting evaluations required before the retraining gate
    /// opens.
    pub persistence_threshold: u32,
    /// Mean pooled confidence below this reads as Degrading.
    pub degrading_mean: f64,
    /// Mean pooled confidence below this reads as Unreliable.
    pub unreliable_mean: f64,
    /// Pooled-confidence Shannon entropy (nats, 10 bins) above this reads as
    /// Degrading. A healthy stream concentrates in one or two bins
    /// (roughly 0.8 nats).
    pub degrading_entropy: f64,
    /// Entropy above this reads as Unreliable.
    pub unreliable_entropy: f64,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            drift_presence_threshold: 10.0,
            budget_decrement_divisor: 10.0,
            low_band_max: 30.0,
            medium_band_max: 60.0,
            high_band_max: 80.0,
            attribution_history_cap: 20,
            audit_log_cap: 50,
            persistence_threshold: 5,
            degrading_mean: 0.80,
            unreliable_mean: 0.60,
            degrading_entropy: 1.2,
            unreliable_entropy: 1.8,
        }
    }
}

impl SentinelConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Reject configurations the engine cannot operate under.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.significance_level) {
            return Err(SentinelError::InvalidConfig {
                details: format!(
                    "significance_level must be in [0, 1], got {}",
                    self.significance_level
                ),
            });
        }
        if self.budget_decrement_divisor <= 0.0 {
            return Err(SentinelError::InvalidConfig {
                details: "budget_decrement_divisor must be positive".to_string(),
            });
        }
        if !(self.low_band_max < self.medium_band_max && self.medium_band_max < self.high_band_max)
        {
            return Err(SentinelError::InvalidConfig {
                details: "risk bands must be strictly increasing".to_string(),
            });
        }
        if self.attribution_history_cap == 0 || self.audit_log_cap == 0 {
            return Err(SentinelError::InvalidConfig {
                details: "history caps must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
