//! Operator playbook: fixed advisory text per drifting feature, with a
//! defined default for anything unattributed.

use crate::engine::types::FeatureId;

/// Advisory for the attributed feature, or the manual-audit default.
#[must_use]
pub const fn advisory(feature: Option<FeatureId>) -> &'static str {
    match feature {
        Some(FeatureId::Helmet) => {
            "Check camera height and angle. Workers may be wearing non-standard helmets."
        }
        Some(FeatureId::Harness) => {
            "Critical safety failure. Inspect camera lens for dust or fog immediately."
        }
        Some(FeatureId::Vest) => "Lighting issue likely. Toggle IR mode or clean the lens.",
        None => "Manual safety audit required.",
    }
}
