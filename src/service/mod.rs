//! Collaborator layer: owns the engine behind a single mutex and exposes
//! the operator-facing operations (status checks, drift reports,
//! explainability, forecasting, calibration, drift injection, audit log).
//!
//! All engine-state mutation funnels through [`Sentinel`]'s lock, so budget
//! consumption, baseline replacement, and attribution appends never
//! interleave.

pub mod audit;
pub mod playbook;
pub mod status;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::core::config::SentinelConfig;
use crate::core::errors::Result;
use crate::engine::DriftEngine;
use crate::engine::entropy::EntropyReading;
use crate::engine::types::{Batch, FeatureId, Severity};
use crate::service::audit::{AuditEntry, AuditLevel, AuditLog};
use crate::service::status::RiskLevel;
use crate::simulator::{self, DriftPreset};

/// Records per simulated status-check batch.
const STATUS_BATCH_SIZE: usize = 100;
/// Records in the initial calibration draw.
const CALIBRATION_BATCH_SIZE: usize = 1000;

/// Whether a status check produced a usable evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SystemStatus {
    /// Evaluation completed.
    Active,
    /// Evaluation was skipped (recoverable engine error); no score is
    /// fabricated and no budget was consumed.
    Inconclusive,
}

/// Operator-facing status payload.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Whether the evaluation ran.
    pub status: SystemStatus,
    /// Tiered risk level; absent when inconclusive.
    pub risk_level: Option<RiskLevel>,
    /// Operator action for the current level.
    pub action_required: String,
    /// Aggregate drift score; absent when inconclusive.
    pub global_drift_score: Option<f64>,
    /// Remaining risk budget.
    pub risk_budget: f64,
    /// Model-certainty reading for the same batch.
    pub model_confidence: EntropyReading,
    /// Active drift-injection preset, if any.
    pub simulation_mode: Option<DriftPreset>,
    /// Error code when inconclusive.
    pub error_code: Option<String>,
}

/// One feature's row in the drift report payload.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureDetail {
    /// Wire name of the feature.
    pub feature: &'static str,
    /// Whether drift was detected.
    pub drift_detected: bool,
    /// KS p-value.
    pub p_value: f64,
    /// Ordinal severity.
    pub severity: Severity,
}

/// Full drift report payload.
#[derive(Debug, Clone, Serialize)]
pub struct DriftReportResponse {
    /// Stable fingerprint of the drifting-feature set.
    pub drift_signature: String,
    /// Per-feature details, criticality order.
    pub feature_details: Vec<FeatureDetail>,
    /// Aggregate score for this evaluation.
    pub global_drift_score: f64,
    /// Budget remaining after this evaluation.
    pub risk_budget: f64,
}

/// Explainability payload.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainResponse {
    /// The most responsible feature.
    pub top_driving_feature: &'static str,
    /// Playbook advisory for that feature.
    pub operator_message: &'static str,
    /// Contribution per feature.
    pub all_feature_scores: Vec<(String, f64)>,
    /// Rolling attribution history, most recent first.
    pub attribution_timeline: Vec<crate::engine::attribution::AttributionRecord>,
}

/// Retraining forecast payload.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    /// Whether the retraining gate is open.
    pub retraining_gate_open: bool,
    /// Operator-readable explanation.
    pub message: String,
    /// Consecutive drifting evaluations so far.
    pub persistence_counter: u32,
}

/// Calibration acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrateResponse {
    /// Confirmation text.
    pub message: String,
    /// Budget after the reset.
    pub new_risk_budget: f64,
}

struct SentinelState {
    engine: DriftEngine,
    audit: AuditLog,
    simulation: Option<DriftPreset>,
    persistence_counter: u32,
    last_level: RiskLevel,
    rng: StdRng,
}

/// Single-writer handle over the whole monitoring state.
pub struct Sentinel {
    state: Mutex<SentinelState>,
}

impl Sentinel {
    /// Boot a sentinel with a fresh baseline drawn from the reference
    /// stream, using OS entropy.
    pub fn new(config: SentinelConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic variant for tests and replayable drills.
    pub fn with_seed(config: SentinelConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SentinelConfig, mut rng: StdRng) -> Result<Self> {
        let audit_cap = config.audit_log_cap;
        let reference = simulator::reference_batch(CALIBRATION_BATCH_SIZE, &mut rng);
        let engine = DriftEngine::new(&reference, config)?;
        Ok(Self {
            state: Mutex::new(SentinelState {
                engine,
                audit: AuditLog::new(audit_cap),
                simulation: None,
                persistence_counter: 0,
                last_level: RiskLevel::Low,
                rng,
            }),
        })
    }

    /// Run one status check: draw a batch, evaluate, classify, and update
    /// the persistence counter. Critical/High levels and level changes are
    /// recorded in the black box with their attributed root cause.
    ///
    /// Recoverable engine errors are absorbed into an Inconclusive response
    /// after a single audit entry; nothing is scored and no budget burns.
    pub fn status(&self) -> Result<StatusResponse> {
        let state = &mut *self.state.lock();
        let batch = draw_batch(state);
        let model_confidence = state.engine.check_entropy(&batch);

        let evaluation = match state.engine.evaluate(&batch) {
            Ok(evaluation) => evaluation,
            Err(err) if err.is_recoverable() => {
                state.audit.record(
                    AuditLevel::Info,
                    "Status check inconclusive; evaluation skipped",
                    None,
                    err.code(),
                );
                return Ok(StatusResponse {
                    status: SystemStatus::Inconclusive,
                    risk_level: None,
                    action_required: "Evaluation skipped; retry with a fuller batch.".to_string(),
                    global_drift_score: None,
                    risk_budget: state.engine.budget(),
                    model_confidence,
                    simulation_mode: state.simulation,
                    error_code: Some(err.code().to_string()),
                });
            }
            Err(err) => return Err(err),
        };

        if evaluation.report.any_drift() {
            state.persistence_counter += 1;
        } else {
            state.persistence_counter = 0;
        }

        let level = RiskLevel::classify(evaluation.score, evaluation.budget, state.engine.config());
        if level >= RiskLevel::High || level != state.last_level {
            let root_cause = state.engine.explain(&batch).map_or_else(
                |_| "unattributed".to_string(),
                |attribution| attribution.top_feature.wire_name().to_string(),
            );
            let audit_level = match level {
                RiskLevel::Critical => AuditLevel::Critical,
                RiskLevel::High => AuditLevel::High,
                RiskLevel::Medium => AuditLevel::Medium,
                RiskLevel::Low => AuditLevel::Info,
            };
            state
                .audit
                .record(audit_level, level.action(), Some(evaluation.score), root_cause);
        }
        state.last_level = level;

        Ok(StatusResponse {
            status: SystemStatus::Active,
            risk_level: Some(level),
            action_required: level.action().to_string(),
            global_drift_score: Some(evaluation.score),
            risk_budget: evaluation.budget,
            model_confidence,
            simulation_mode: state.simulation,
            error_code: None,
        })
    }

    /// Evaluate a fresh batch and return the formatted per-feature report
    /// with its fingerprint.
    pub fn drift_report(&self) -> Result<DriftReportResponse> {
        let state = &mut *self.state.lock();
        let batch = draw_batch(state);
        let evaluation = state.engine.evaluate(&batch)?;
        let feature_details = evaluation
            .report
            .iter()
            .map(|(feature, result)| FeatureDetail {
                feature: feature.wire_name(),
                drift_detected: result.drift_detected,
                p_value: result.p_value,
                severity: result.severity,
            })
            .collect();
        Ok(DriftReportResponse {
            drift_signature: DriftEngine::fingerprint(&evaluation.report),
            feature_details,
            global_drift_score: evaluation.score,
            risk_budget: evaluation.budget,
        })
    }

    /// Attribute blame for a fresh batch and pair it with the playbook
    /// advisory. Failures are audit-logged once before surfacing.
    pub fn explainability(&self) -> Result<ExplainResponse> {
        let state = &mut *self.state.lock();
        let batch = draw_batch(state);
        let attribution = match state.engine.explain(&batch) {
            Ok(attribution) => attribution,
            Err(err) => {
                state.audit.record(
                    AuditLevel::Info,
                    "Explainability request failed",
                    None,
                    err.code(),
                );
                return Err(err);
            }
        };
        Ok(ExplainResponse {
            top_driving_feature: attribution.top_feature.wire_name(),
            operator_message: playbook::advisory(Some(attribution.top_feature)),
            all_feature_scores: attribution
                .scores
                .iter()
                .map(|(feature, score)| (feature.wire_name().to_string(), *score))
                .collect(),
            attribution_timeline: attribution.history,
        })
    }

    /// Report the retraining gate: open after more than the configured
    /// number of consecutive drifting evaluations.
    pub fn forecast(&self) -> ForecastResponse {
        let state = self.state.lock();
        let threshold = state.engine.config().persistence_threshold;
        let counter = state.persistence_counter;
        let (open, message) = if counter > threshold {
            (
                true,
                "Gate open: persistent confidence drop. Ready to retrain.".to_string(),
            )
        } else if counter > 0 {
            (
                false,
                format!("Gate closed: transient shift ({counter} consecutive). Waiting."),
            )
        } else {
            (false, "System healthy.".to_string())
        };
        ForecastResponse {
            retraining_gate_open: open,
            message,
            persistence_counter: counter,
        }
    }

    /// Adopt the current stream as the new baseline and restore the budget.
    /// Failures leave baseline, budget, and counter untouched and are
    /// audit-logged once.
    pub fn calibrate(&self) -> Result<CalibrateResponse> {
        let state = &mut *self.state.lock();
        let batch = draw_calibration_batch(state);
        if let Err(err) = state.engine.recalibrate(&batch) {
            state
                .audit
                .record(AuditLevel::Info, "Calibration failed", None, err.code());
            return Err(err);
        }
        state.persistence_counter = 0;
        state.audit.record(
            AuditLevel::Info,
            "Manual calibration triggered",
            None,
            "supervisor action",
        );
        Ok(CalibrateResponse {
            message: "Baseline calibrated. New normal established.".to_string(),
            new_risk_budget: state.engine.budget(),
        })
    }

    /// Toggle the synthetic drift injection used for drills.
    pub fn inject_drift(&self, preset: Option<DriftPreset>) -> String {
        let state = &mut *self.state.lock();
        state.simulation = preset;
        let message = preset.map_or_else(
            || "Drift simulation disabled".to_string(),
            |p| format!("Drift simulation enabled (severity: {p})"),
        );
        state
            .audit
            .record(AuditLevel::Info, "Drift simulation toggled", None, &message);
        message
    }

    /// Black-box entries, newest first.
    pub fn logs(&self) -> Vec<AuditEntry> {
        self.state.lock().audit.entries().iter().cloned().collect()
    }

    /// Playbook advisory lookup by wire name; unknown names get the default.
    #[must_use]
    pub fn advisory_for(name: &str) -> &'static str {
        playbook::advisory(FeatureId::from_wire(name))
    }
}

fn draw_batch(state: &mut SentinelState) -> Batch {
    match state.simulation {
        None => simulator::reference_batch(STATUS_BATCH_SIZE, &mut state.rng),
        Some(preset) => simulator::drifted_batch(STATUS_BATCH_SIZE, preset, &mut state.rng),
    }
}

fn draw_calibration_batch(state: &mut SentinelState) -> Batch {
    match state.simulation {
        None => simulator::reference_batch(CALIBRATION_BATCH_SIZE, &mut state.rng),
        Some(preset) => simulator::drifted_batch(CALIBRATION_BATCH_SIZE, preset, &mut state.rng),
    }
}

#[cfg(test)]
mod tests {
    use super::{Sentinel, SystemStatus};
    use crate::core::config::SentinelConfig;
    use crate::service::status::RiskLevel;
    use crate::simulator::DriftPreset;

    fn sentinel() -> Sentinel {
        Sentinel::with_seed(SentinelConfig::default(), 42).unwrap()
    }

    #[test]
    fn clean_stream_reports_low_risk() {
        let sentinel = sentinel();
        let response = sentinel.status().unwrap();
        assert_eq!(response.status, SystemStatus::Active);
        assert!((response.risk_budget - 100.0).abs() < 30.0);
        assert!(response.risk_level.is_some());
    }

    #[test]
    fn high_injection_escalates_and_audits() {
        let sentinel = sentinel();
        sentinel.inject_drift(Some(DriftPreset::High));
        let response = sentinel.status().unwrap();
        assert_eq!(response.risk_level, Some(RiskLevel::Critical));
        assert!(response.global_drift_score.unwrap() > 80.0);
        assert!(response.risk_budget < 100.0);
        // Toggle entry plus the critical event.
        assert!(sentinel.logs().len() >= 2);
    }

    #[test]
    fn persistence_counter_tracks_consecutive_drift() {
        let sentinel = sentinel();
        sentinel.inject_drift(Some(DriftPreset::High));
        for _ in 0..7 {
            sentinel.status().unwrap();
        }
        let forecast = sentinel.forecast();
        assert!(forecast.retraining_gate_open);
        assert_eq!(forecast.persistence_counter, 7);

        sentinel.inject_drift(None);
        sentinel.status().unwrap();
        assert_eq!(sentinel.forecast().persistence_counter, 0);
    }

    #[test]
    fn calibration_restores_budget_and_closes_gate() {
        let sentinel = sentinel();
        sentinel.inject_drift(Some(DriftPreset::Medium));
        for _ in 0..6 {
            sentinel.status().unwrap();
        }
        let ack = sentinel.calibrate().unwrap();
        assert!((ack.new_risk_budget - 100.0).abs() < f64::EPSILON);
        assert_eq!(sentinel.forecast().persistence_counter, 0);

        // The injected distribution is the new normal: next check is clean.
        let response = sentinel.status().unwrap();
        assert_eq!(response.risk_level, Some(RiskLevel::Low));
    }

    #[test]
    fn explainability_names_a_feature_and_advisory() {
        let sentinel = sentinel();
        sentinel.inject_drift(Some(DriftPreset::High));
        let explain = sentinel.explainability().unwrap();
        assert_eq!(explain.top_driving_feature, "Harness_Conf");
        assert!(explain.operator_message.contains("lens"));
        assert_eq!(explain.all_feature_scores.len(), 3);
    }

    #[test]
    fn report_fingerprint_is_stable_for_a_stable_incident() {
        let sentinel = sentinel();
        sentinel.inject_drift(Some(DriftPreset::High));
        let a = sentinel.drift_report().unwrap();
        let b = sentinel.drift_report().unwrap();
        assert_eq!(a.drift_signature, b.drift_signature);
        assert!(b.risk_budget < a.risk_budget);
    }
}
