//! Classification result model.

use serde::{Deserialize, Serialize};

use crate::allocation::AllocationResult;
use crate::classification::{AffordabilityTier, BehaviorCategory, DominantCategory};
use crate::personas::MatchSource;
use crate::profile::NormalizedProfile;

/// Everything one classification produced, including the intermediate
/// labels that explain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub persona_id: String,
    pub persona_name: String,
    pub goal_id: String,
    pub profile: NormalizedProfile,
    pub region_multiplier: f64,
    pub adjusted_income: f64,
    pub tier: AffordabilityTier,
    pub behavior: BehaviorCategory,
    pub dominant_category: DominantCategory,
    pub match_source: MatchSource,
    pub allocation: AllocationResult,
}

impl ClassificationResult {
    /// True when the persona came from the vector-similarity matcher.
    pub fn is_fallback(&self) -> bool {
        self.match_source.is_fallback()
    }

    /// The rule that decided, if a rule did.
    pub fn rule_id(&self) -> Option<&str> {
        match &self.match_source {
            MatchSource::Rule { rule_id } => Some(rule_id),
            MatchSource::Similarity { .. } => None,
        }
    }
}
