//! Core data model: monitored features, batches, and per-feature test
//! results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The monitored PPE confidence features, in fixed criticality order.
///
/// Declaration order doubles as the tie-break priority: a harness miss is a
/// fall hazard, so `Harness` outranks `Helmet`, which outranks `Vest`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FeatureId {
    /// Fall-harness detection confidence.
    Harness,
    /// Hard-hat detection confidence.
    Helmet,
    /// Hi-vis vest detection confidence.
    Vest,
}

impl FeatureId {
    /// Every monitored feature, highest criticality first.
    pub const ALL: [Self; 3] = [Self::Harness, Self::Helmet, Self::Vest];

    /// Column name used by upstream detectors and the simulator.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Harness => "Harness_Conf",
            Self::Helmet => "Helmet_Conf",
            Self::Vest => "Vest_Conf",
        }
    }

    /// Fixed criticality weight. Weights sum to 1.0 so the aggregate risk
    /// score stays bounded in [0, 100].
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Harness => 0.5,
            Self::Helmet => 0.3,
            Self::Vest => 0.2,
        }
    }

    /// Resolve a wire name back to a feature.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Camera zone metadata carried on each record. Not used by any statistical
/// test yet; retained for future per-zone segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraZone {
    /// Site entry turnstiles.
    Entry,
    /// Underground mining face.
    Mining,
    /// Work-at-heights platforms.
    Heights,
}

impl CameraZone {
    /// All zones, for uniform sampling in the simulator.
    pub const ALL: [Self; 3] = [Self::Entry, Self::Mining, Self::Heights];
}

/// One detection observation: a confidence per feature plus zone metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Helmet confidence in [0, 1].
    pub helmet: f64,
    /// Vest confidence in [0, 1].
    pub vest: f64,
    /// Harness confidence in [0, 1].
    pub harness: f64,
    /// Originating camera zone.
    pub zone: CameraZone,
}

impl Record {
    /// Confidence value for one feature.
    #[must_use]
    pub const fn value(&self, feature: FeatureId) -> f64 {
        match feature {
            FeatureId::Harness => self.harness,
            FeatureId::Helmet => self.helmet,
            FeatureId::Vest => self.vest,
        }
    }
}

/// An ephemeral evaluation batch: ordered records, created per call and
/// discarded after.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    /// Wrap a record sequence.
    #[must_use]
    pub const fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records in arrival order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Extract one feature's column in arrival order.
    #[must_use]
    pub fn column(&self, feature: FeatureId) -> Vec<f64> {
        self.records.iter().map(|r| r.value(feature)).collect()
    }

    /// All confidence values across every feature, pooled.
    #[must_use]
    pub fn pooled_values(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.records.len() * FeatureId::ALL.len());
        for record in &self.records {
            for feature in FeatureId::ALL {
                values.push(record.value(feature));
            }
        }
        values
    }
}

/// Ordinal drift severity for one feature.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No statistically significant divergence.
    None,
    /// Detected, mean shift under one reference sigma.
    Mild,
    /// Detected, mean shift in [1, 2) reference sigmas.
    Moderate,
    /// Detected, mean shift of two or more reference sigmas.
    Severe,
}

impl Severity {
    /// Magnitude used by the weighted risk aggregation.
    #[must_use]
    pub const fn magnitude(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Mild => 1.0,
            Self::Moderate => 2.0,
            Self::Severe => 3.0,
        }
    }

    /// Largest magnitude any severity can contribute.
    pub const MAX_MAGNITUDE: f64 = 3.0;
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        };
        f.write_str(label)
    }
}

/// Outcome of one feature's two-sample test against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureTestResult {
    /// KS p-value in [0, 1].
    pub p_value: f64,
    /// Whether the p-value fell below the significance level.
    pub drift_detected: bool,
    /// Ordinal severity classification.
    pub severity: Severity,
    /// Mean shift in units of reference standard deviation.
    pub mean_shift_sigma: f64,
}

/// One evaluation's results: exactly one entry per monitored feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DriftReport {
    entries: Vec<(FeatureId, FeatureTestResult)>,
}

impl DriftReport {
    /// Build a report from per-feature results. Callers supply one result
    /// per monitored feature; order is normalized to criticality order.
    #[must_use]
    pub fn new(mut entries: Vec<(FeatureId, FeatureTestResult)>) -> Self {
        entries.sort_by_key(|(feature, _)| *feature);
        Self { entries }
    }

    /// Result for one feature.
    #[must_use]
    pub fn get(&self, feature: FeatureId) -> Option<&FeatureTestResult> {
        self.entries
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, result)| result)
    }

    /// Iterate entries in criticality order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &FeatureTestResult)> {
        self.entries.iter().map(|(f, r)| (*f, r))
    }

    /// Features currently flagged as drifting, criticality order.
    #[must_use]
    pub fn drifting(&self) -> Vec<FeatureId> {
        self.entries
            .iter()
            .filter(|(_, r)| r.drift_detected)
            .map(|(f, _)| *f)
            .collect()
    }

    /// Whether any feature is flagged.
    #[must_use]
    pub fn any_drift(&self) -> bool {
        self.entries.iter().any(|(_, r)| r.drift_detected)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report carries no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Batch, CameraZone, DriftReport, FeatureId, FeatureTestResult, Record, Severity};

    fn record(helmet: f64, vest: f64, harness: f64) -> Record {
        Record {
            helmet,
            vest,
            harness,
            zone: CameraZone::Entry,
        }
    }

    #[test]
    fn feature_order_matches_criticality() {
        assert!(FeatureId::Harness < FeatureId::Helmet);
        assert!(FeatureId::Helmet < FeatureId::Vest);
        assert!(FeatureId::Harness.weight() > FeatureId::Helmet.weight());
        assert!(FeatureId::Helmet.weight() > FeatureId::Vest.weight());
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = FeatureId::ALL.iter().map(|f| f.weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wire_names_round_trip() {
        for feature in FeatureId::ALL {
            assert_eq!(FeatureId::from_wire(feature.wire_name()), Some(feature));
        }
        assert_eq!(FeatureId::from_wire("Gloves_Conf"), None);
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::None < Severity::Mild);
        assert!(Severity::Mild < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Severe);
    }

    #[test]
    fn batch_column_preserves_order() {
        let batch = Batch::new(vec![record(0.9, 0.8, 0.7), record(0.1, 0.2, 0.3)]);
        assert_eq!(batch.column(FeatureId::Helmet), vec![0.9, 0.1]);
        assert_eq!(batch.column(FeatureId::Harness), vec![0.7, 0.3]);
        assert_eq!(batch.pooled_values().len(), 6);
    }

    #[test]
    fn report_normalizes_to_criticality_order() {
        let result = FeatureTestResult {
            p_value: 1.0,
            drift_detected: false,
            severity: Severity::None,
            mean_shift_sigma: 0.0,
        };
        let report = DriftReport::new(vec![
            (FeatureId::Vest, result),
            (FeatureId::Harness, result),
            (FeatureId::Helmet, result),
        ]);
        let order: Vec<FeatureId> = report.iter().map(|(f, _)| f).collect();
        assert_eq!(order, FeatureId::ALL.to_vec());
        assert!(!report.any_drift());
        assert!(report.drifting().is_empty());
    }
}
