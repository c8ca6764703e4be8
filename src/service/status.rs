//! Tiered safe modes: risk levels derived from the drift score and budget,
//! each carrying a fixed operator action.

use serde::{Deserialize, Serialize};

use crate::core::config::SentinelConfig;

/// Operational risk level, driven purely by the evaluation score except
/// that an exhausted budget forces Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Monitoring only.
    Low,
    /// Audio warning on site.
    Medium,
    /// Supervisor alert, pause work.
    High,
    /// Lockdown: turnstiles locked pending manual safety check.
    Critical,
}

impl RiskLevel {
    /// Classify a score against the configured bands. Budget exhaustion
    /// dominates: at or below zero the level is Critical regardless of
    /// score.
    #[must_use]
    pub fn classify(score: f64, budget: f64, config: &SentinelConfig) -> Self {
        if budget <= 0.0 || score > config.high_band_max {
            Self::Critical
        } else if score > config.medium_band_max {
            Self::High
        } else if score > config.low_band_max {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Fixed operator action for this level.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Low => "Access granted: monitoring active.",
            Self::Medium => "Warning: audio broadcast 'Please ensure PPE is visible'.",
            Self::High => "Alert: supervisor haptic notification sent. Pause work.",
            Self::Critical => "Lockdown: turnstiles locked. Manual safety check required.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        })
    }
}
