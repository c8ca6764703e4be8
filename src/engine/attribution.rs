//! Drift attribution: ranks features by contribution to the current drift
//! signal and keeps a bounded rolling history of top contributors.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SentinelError};
use crate::engine::scoring::RiskScorer;
use crate::engine::types::{DriftReport, FeatureId};

/// One batch's top contributor, as appended to the rolling history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionRecord {
    /// Feature blamed for this batch.
    pub feature: FeatureId,
    /// Its contribution to the aggregate score at that time.
    pub contribution: f64,
    /// When the attribution was made.
    pub at: DateTime<Utc>,
}

/// Result of one attribution call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    /// The single most responsible feature.
    pub top_feature: FeatureId,
    /// Contribution per feature, criticality order.
    pub scores: Vec<(FeatureId, f64)>,
    /// Past top contributors, most recent first, bounded length.
    pub history: Vec<AttributionRecord>,
}

/// Tracks blame over time with FIFO-bounded history.
#[derive(Debug, Clone)]
pub struct AttributionTracker {
    history: VecDeque<AttributionRecord>,
    cap: usize,
}

impl AttributionTracker {
    /// Tracker retaining at most `cap` records.
    #[must_use]
    pub const fn new(cap: usize) -> Self {
        Self {
            history: VecDeque::new(),
            cap,
        }
    }

    /// Rank features by contribution, record the winner, and return the
    /// ranking plus history. Ties break on criticality: Harness > Helmet >
    /// Vest.
    pub fn attribute(&mut self, report: &DriftReport) -> Result<Attribution> {
        if report.is_empty() {
            return Err(SentinelError::EmptyReport);
        }

        let scores: Vec<(FeatureId, f64)> = report
            .iter()
            .map(|(feature, result)| (feature, RiskScorer::contribution(feature, result.severity)))
            .collect();

        // Entries are in criticality order, so a strict comparison keeps the
        // higher-priority feature on ties.
        let (top_feature, top_contribution) = scores
            .iter()
            .copied()
            .fold(scores[0], |best, candidate| {
                if candidate.1 > best.1 { candidate } else { best }
            });

        self.history.push_front(AttributionRecord {
            feature: top_feature,
            contribution: top_contribution,
            at: Utc::now(),
        });
        self.history.truncate(self.cap);

        Ok(Attribution {
            top_feature,
            scores,
            history: self.history.iter().cloned().collect(),
        })
    }

    /// Retained records, most recent first.
    #[must_use]
    pub fn history(&self) -> &VecDeque<AttributionRecord> {
        &self.history
    }
}
