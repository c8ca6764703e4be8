//! Confidence-certainty monitor: pooled Shannon entropy and mean confidence
//! over the current batch, classified into a qualitative status.
//!
//! Pure function of the batch; shares no engine state.

use serde::{Deserialize, Serialize};

use crate::core::config::SentinelConfig;
use crate::engine::types::Batch;

/// Number of equal-width histogram bins over [0, 1].
const ENTROPY_BINS: usize = 10;

/// Qualitative model-certainty status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntropyStatus {
    /// Confidences are concentrated and high.
    Stable,
    /// Confidence mass is spreading or sagging; watch closely.
    Degrading,
    /// Confidence is low or widely dispersed; scores are untrustworthy.
    Unreliable,
}

impl std::fmt::Display for EntropyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Stable => "Stable",
            Self::Degrading => "Degrading",
            Self::Unreliable => "Unreliable",
        };
        f.write_str(label)
    }
}

/// Status plus the raw statistics behind it, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyReading {
    /// Qualitative classification.
    pub status: EntropyStatus,
    /// Mean of all pooled confidence values.
    pub mean_confidence: f64,
    /// Shannon entropy (nats) of the pooled 10-bin histogram.
    pub entropy_nats: f64,
}

/// Classify the batch's pooled confidence dispersion.
///
/// Empty batches read as Unreliable: no data is the least trustworthy
/// signal of all.
#[must_use]
pub fn check(batch: &Batch, config: &SentinelConfig) -> EntropyReading {
    let values = batch.pooled_values();
    if values.is_empty() {
        return EntropyReading {
            status: EntropyStatus::Unreliable,
            mean_confidence: 0.0,
            entropy_nats: 0.0,
        };
    }

    let mean_confidence = values.iter().sum::<f64>() / values.len() as f64;

    let mut counts = [0usize; ENTROPY_BINS];
    for value in &values {
        let bin = ((value.clamp(0.0, 1.0) * ENTROPY_BINS as f64) as usize).min(ENTROPY_BINS - 1);
        counts[bin] += 1;
    }
    let total = values.len() as f64;
    let entropy_nats = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum::<f64>();

    let status = if mean_confidence < config.unreliable_mean
        || entropy_nats > config.unreliable_entropy
    {
        EntropyStatus::Unreliable
    } else if mean_confidence < config.degrading_mean || entropy_nats > config.degrading_entropy {
        EntropyStatus::Degrading
    } else {
        EntropyStatus::Stable
    };

    EntropyReading {
        status,
        mean_confidence,
        entropy_nats,
    }
}
