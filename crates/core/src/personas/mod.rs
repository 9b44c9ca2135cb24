//! Personas module - archetype definitions and the two matching strategies.
//!
//! - **Models** (`personas_model.rs`) - PersonaDefinition, PersonaSet, RiskAppetite
//! - **Traits** (`personas_traits.rs`) - PersonaMatcher, MatchingStrategy, SimilarityMetric
//! - **Rule table** (`rule_matcher.rs`) - ordered decision rules per tier
//! - **Similarity** (`similarity_matcher.rs`) - nearest reference vector

mod personas_model;
mod personas_traits;
mod rule_matcher;
mod similarity_matcher;

pub use personas_model::{PersonaDefinition, PersonaSet, RiskAppetite};
pub use personas_traits::{
    MatchInput, MatchOutcome, MatchSource, MatchingStrategy, PersonaMatch, PersonaMatcher,
    SimilarityMetric,
};
pub use rule_matcher::{
    Comparison, DecisionRule, DecisionTable, RuleOutcome, RulePredicate, RuleTableMatcher,
    ShareCondition, ShareMetric,
};
pub use similarity_matcher::{
    cosine_similarity, euclidean_distance, feature_vector, TierScores, VectorSimilarityMatcher,
};
