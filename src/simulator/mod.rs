//! Synthetic PPE detection batches: a healthy reference stream and two
//! corrupted presets for drills and tests.
//!
//! Mirrors the production camera profile: helmet N(0.92, 0.05), vest
//! N(0.88, 0.06), harness N(0.90, 0.04), all clipped to [0, 1], with a
//! uniformly random camera zone per record.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::engine::types::{Batch, CameraZone, Record};

/// Named drift presets for the corrupted generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftPreset {
    /// Additive sag: vest -0.20, helmet -0.10.
    Medium,
    /// Multiplicative collapse: helmet x0.5, harness x0.4, vest x0.6.
    High,
}

impl std::fmt::Display for DriftPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

struct Profile {
    helmet: Normal<f64>,
    vest: Normal<f64>,
    harness: Normal<f64>,
}

impl Profile {
    fn production() -> Self {
        // Constant, positive standard deviations: construction cannot fail.
        Self {
            helmet: Normal::new(0.92, 0.05).expect("valid helmet profile"),
            vest: Normal::new(0.88, 0.06).expect("valid vest profile"),
            harness: Normal::new(0.90, 0.04).expect("valid harness profile"),
        }
    }

    fn sample(&self, rng: &mut impl Rng) -> (f64, f64, f64) {
        (
            self.helmet.sample(rng),
            self.vest.sample(rng),
            self.harness.sample(rng),
        )
    }
}

fn zone(rng: &mut impl Rng) -> CameraZone {
    CameraZone::ALL[rng.random_range(0..CameraZone::ALL.len())]
}

/// Generate `n` records of healthy detection data.
pub fn reference_batch(n: usize, rng: &mut impl Rng) -> Batch {
    let profile = Profile::production();
    let records = (0..n)
        .map(|_| {
            let (helmet, vest, harness) = profile.sample(rng);
            Record {
                helmet: helmet.clamp(0.0, 1.0),
                vest: vest.clamp(0.0, 1.0),
                harness: harness.clamp(0.0, 1.0),
                zone: zone(rng),
            }
        })
        .collect();
    Batch::new(records)
}

/// Generate `n` records of corrupted detection data under `preset`.
pub fn drifted_batch(n: usize, preset: DriftPreset, rng: &mut impl Rng) -> Batch {
    let profile = Profile::production();
    let records = (0..n)
        .map(|_| {
            let (mut helmet, mut vest, mut harness) = profile.sample(rng);
            match preset {
                DriftPreset::Medium => {
                    vest -= 0.20;
                    helmet -= 0.10;
                }
                DriftPreset::High => {
                    helmet *= 0.5;
                    harness *= 0.4;
                    vest *= 0.6;
                }
            }
            Record {
                helmet: helmet.clamp(0.0, 1.0),
                vest: vest.clamp(0.0, 1.0),
                harness: harness.clamp(0.0, 1.0),
                zone: zone(rng),
            }
        })
        .collect();
    Batch::new(records)
}
