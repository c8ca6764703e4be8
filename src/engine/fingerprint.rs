//! Stable drift-report fingerprints for incident deduplication.
//!
//! The fingerprint is a pure function of which features are drifting, not of
//! their p-values, so two reports describing the same incident signature
//! compare equal.

use sha2::{Digest, Sha256};

use crate::engine::types::DriftReport;

/// Hex characters kept from the SHA-256 digest.
const FINGERPRINT_LEN: usize = 12;

/// Derive the report's fingerprint: drifting feature names sorted
/// lexicographically, joined with `|`, hashed, truncated. The empty set
/// yields a stable "clean" fingerprint.
#[must_use]
pub fn fingerprint(report: &DriftReport) -> String {
    let mut names: Vec<&str> = report
        .drifting()
        .into_iter()
        .map(|feature| feature.wire_name())
        .collect();
    names.sort_unstable();

    let digest = Sha256::digest(names.join("|").as_bytes());
    let mut out = String::with_capacity(FINGERPRINT_LEN);
    for byte in digest {
        for hex in [byte >> 4, byte & 0x0f] {
            out.push(char::from_digit(u32::from(hex), 16).unwrap_or('0'));
            if out.len() == FINGERPRINT_LEN {
                return out;
            }
        }
    }
    out
}
