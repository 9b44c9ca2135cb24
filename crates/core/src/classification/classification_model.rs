//! Coarse labels produced by the classifier stages.

use serde::{Deserialize, Serialize};

use crate::profile::SpendCategory;

/// Affordability bucket derived from cost-of-living-adjusted income.
///
/// Ordered from lowest to highest purchasing power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffordabilityTier {
    Low,
    MidLow,
    MidHigh,
    High,
}

impl AffordabilityTier {
    pub const ALL: [AffordabilityTier; 4] = [
        AffordabilityTier::Low,
        AffordabilityTier::MidLow,
        AffordabilityTier::MidHigh,
        AffordabilityTier::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AffordabilityTier::Low => "LOW",
            AffordabilityTier::MidLow => "MID_LOW",
            AffordabilityTier::MidHigh => "MID_HIGH",
            AffordabilityTier::High => "HIGH",
        }
    }
}

impl std::fmt::Display for AffordabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse spending pattern derived from the needs/wants/savings split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BehaviorCategory {
    Spender,
    Saver,
    Survivor,
    Balanced,
}

impl BehaviorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorCategory::Spender => "SPENDER",
            BehaviorCategory::Saver => "SAVER",
            BehaviorCategory::Survivor => "SURVIVOR",
            BehaviorCategory::Balanced => "BALANCED",
        }
    }
}

impl std::fmt::Display for BehaviorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single "wants" sub-category with the largest share, or `None` when
/// there is no granular spending at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DominantCategory {
    Shopping,
    Dining,
    Travel,
    Entertainment,
    Other,
    None,
}

impl DominantCategory {
    pub fn category(&self) -> Option<SpendCategory> {
        match self {
            DominantCategory::Shopping => Some(SpendCategory::Shopping),
            DominantCategory::Dining => Some(SpendCategory::Dining),
            DominantCategory::Travel => Some(SpendCategory::Travel),
            DominantCategory::Entertainment => Some(SpendCategory::Entertainment),
            DominantCategory::Other => Some(SpendCategory::Other),
            DominantCategory::None => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DominantCategory::None => "NONE",
            DominantCategory::Shopping => "SHOPPING",
            DominantCategory::Dining => "DINING",
            DominantCategory::Travel => "TRAVEL",
            DominantCategory::Entertainment => "ENTERTAINMENT",
            DominantCategory::Other => "OTHER",
        }
    }
}

impl From<SpendCategory> for DominantCategory {
    fn from(category: SpendCategory) -> Self {
        match category {
            SpendCategory::Shopping => DominantCategory::Shopping,
            SpendCategory::Dining => DominantCategory::Dining,
            SpendCategory::Travel => DominantCategory::Travel,
            SpendCategory::Entertainment => DominantCategory::Entertainment,
            SpendCategory::Other => DominantCategory::Other,
        }
    }
}

impl std::fmt::Display for DominantCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of the affordability tier classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAssessment {
    pub region_multiplier: f64,
    pub adjusted_income: f64,
    pub tier: AffordabilityTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(AffordabilityTier::Low < AffordabilityTier::MidLow);
        assert!(AffordabilityTier::MidLow < AffordabilityTier::MidHigh);
        assert!(AffordabilityTier::MidHigh < AffordabilityTier::High);
    }

    #[test]
    fn test_labels_serialize_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&AffordabilityTier::MidHigh).unwrap(),
            "\"MID_HIGH\""
        );
        assert_eq!(
            serde_json::to_string(&DominantCategory::None).unwrap(),
            "\"NONE\""
        );
        assert_eq!(
            serde_json::from_str::<BehaviorCategory>("\"SURVIVOR\"").unwrap(),
            BehaviorCategory::Survivor
        );
    }

    #[test]
    fn test_dominant_category_round_trips_spend_category() {
        for category in SpendCategory::ALL {
            assert_eq!(DominantCategory::from(category).category(), Some(category));
        }
        assert_eq!(DominantCategory::None.category(), None);
    }
}
