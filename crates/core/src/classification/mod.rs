//! Classification module - the coarse classifier stages.
//!
//! - **Tier** (`tier_classifier.rs`) - income adjusted by regional cost of living
//! - **Behavior** (`behavior_classifier.rs`) - needs/wants/savings pattern
//! - **Preference** (`preference_resolver.rs`) - dominant "wants" sub-category

mod behavior_classifier;
mod classification_model;
mod preference_resolver;
mod tier_classifier;

pub use behavior_classifier::{classify_behavior, BehaviorThresholds};
pub use classification_model::{
    AffordabilityTier, BehaviorCategory, DominantCategory, TierAssessment,
};
pub use preference_resolver::resolve_dominant_category;
pub use tier_classifier::{
    classify_tier, region_slug, tier_for_adjusted_income, RegionalCostIndex, TierBreakpoint,
    TierSettings,
};
