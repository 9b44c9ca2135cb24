//! Behavioral pattern classification.

use serde::{Deserialize, Serialize};

use super::classification_model::BehaviorCategory;

/// Strict-inequality thresholds for the behavior categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorThresholds {
    /// wants above this is SPENDER (default: 30)
    pub spender: f64,

    /// savings above this is SAVER (default: 30)
    pub saver: f64,

    /// needs above this is SURVIVOR (default: 55)
    pub survivor: f64,
}

impl Default for BehaviorThresholds {
    fn default() -> Self {
        Self {
            spender: 30.0,
            saver: 30.0,
            survivor: 55.0,
        }
    }
}

/// Classifies a normalized needs/wants/savings split.
///
/// Checked in fixed order: spender, saver, survivor, balanced. A profile
/// that is both high-wants and high-savings is a SPENDER.
pub fn classify_behavior(
    needs: f64,
    wants: f64,
    savings: f64,
    thresholds: &BehaviorThresholds,
) -> BehaviorCategory {
    if wants > thresholds.spender {
        BehaviorCategory::Spender
    } else if savings > thresholds.saver {
        BehaviorCategory::Saver
    } else if needs > thresholds.survivor {
        BehaviorCategory::Survivor
    } else {
        BehaviorCategory::Balanced
    }
}
