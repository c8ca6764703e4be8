//! Two-sample Kolmogorov–Smirnov drift test with severity classification.
//!
//! The KS statistic is the supremum distance between the two empirical
//! CDFs; the p-value comes from the asymptotic Kolmogorov distribution with
//! the small-sample correction from Numerical Recipes. Severity grades the
//! practical effect size: mean shift measured in reference sigmas.

use crate::core::config::MIN_TEST_SAMPLES;
use crate::core::errors::{Result, SentinelError};
use crate::engine::types::{FeatureId, FeatureTestResult, Severity};

/// Severity boundary: shifts under one reference sigma are Mild.
const MODERATE_SHIFT_SIGMA: f64 = 1.0;
/// Severity boundary: shifts of two or more reference sigmas are Severe.
const SEVERE_SHIFT_SIGMA: f64 = 2.0;

/// Runs the per-feature distributional-difference test.
#[derive(Debug, Clone, Copy)]
pub struct FeatureDriftTester {
    significance_level: f64,
}

impl FeatureDriftTester {
    /// Tester flagging drift below the given significance level.
    #[must_use]
    pub const fn new(significance_level: f64) -> Self {
        Self { significance_level }
    }

    /// Compare `current` against `reference` for one feature.
    ///
    /// `reference_stats` is the baseline (mean, std) pair, used only for the
    /// severity grade; detection itself is purely distributional.
    pub fn test(
        &self,
        feature: FeatureId,
        reference: &[f64],
        reference_stats: (f64, f64),
        current: &[f64],
    ) -> Result<FeatureTestResult> {
        if current.len() < MIN_TEST_SAMPLES {
            return Err(SentinelError::InsufficientSampleSize {
                feature: feature.wire_name(),
                got: current.len(),
                need: MIN_TEST_SAMPLES,
            });
        }

        let statistic = ks_statistic(reference, current);
        let p_value = ks_p_value(statistic, reference.len(), current.len());
        let drift_detected = p_value < self.significance_level;

        let (ref_mean, ref_std) = reference_stats;
        let current_mean = current.iter().sum::<f64>() / current.len() as f64;
        let shift = (current_mean - ref_mean).abs();
        // Degenerate baselines (std ~ 0) make any detected shift Severe
        // rather than dividing by zero.
        let mean_shift_sigma = if ref_std > f64::EPSILON {
            shift / ref_std
        } else if shift > f64::EPSILON {
            f64::INFINITY
        } else {
            0.0
        };

        let severity = if !drift_detected {
            Severity::None
        } else if mean_shift_sigma >= SEVERE_SHIFT_SIGMA {
            Severity::Severe
        } else if mean_shift_sigma >= MODERATE_SHIFT_SIGMA {
            Severity::Moderate
        } else {
            Severity::Mild
        };

        Ok(FeatureTestResult {
            p_value,
            drift_detected,
            severity,
            mean_shift_sigma,
        })
    }
}

/// Supremum distance between the two empirical CDFs.
fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / na - j as f64 / nb).abs());
    }
    d
}

/// Asymptotic two-sample KS p-value with the Stephens small-sample
/// correction on the effective sample size.
fn ks_p_value(statistic: f64, n1: usize, n2: usize) -> f64 {
    let ne = (n1 * n2) as f64 / (n1 + n2) as f64;
    let sqrt_ne = ne.sqrt();
    let lambda = (sqrt_ne + 0.12 + 0.11 / sqrt_ne) * statistic;
    kolmogorov_survival(lambda)
}

/// Q_KS(lambda) = 2 * sum_{j>=1} (-1)^(j-1) * exp(-2 j^2 lambda^2).
fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda < 1e-3 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for j in 1..=100u32 {
        let term = (-2.0 * f64::from(j * j) * lambda * lambda).exp();
        sum += sign * term;
        sign = -sign;
        if term < 1e-12 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}
