//! PPE Drift Sentinel: real-time drift detection and risk scoring for
//! model-confidence streams from PPE detection cameras.
//!
//! The core is a small stateful statistical engine ([`engine::DriftEngine`])
//! that KS-tests incoming feature distributions against a stored baseline,
//! aggregates the evidence into a bounded risk score and a depleting risk
//! budget, grades model certainty with an entropy statistic, attributes
//! blame to the most responsible feature, and fingerprints drift reports
//! for incident deduplication. The [`service`] layer wraps one engine in a
//! mutex and exposes the operator-facing operations; the `pds` binary
//! (feature `cli`) fronts those operations on the command line.

pub mod core;
pub mod engine;
pub mod service;
pub mod simulator;

#[cfg(feature = "cli")]
pub mod cli_app;

#[cfg(test)]
mod risk_plane_tests;

pub use crate::core::config::SentinelConfig;
pub use crate::core::errors::{Result, SentinelError};
pub use crate::engine::{DriftEngine, Evaluation};
pub use crate::service::Sentinel;
