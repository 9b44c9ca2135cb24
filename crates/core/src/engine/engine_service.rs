//! Persona engine: the full classification pipeline.

use log::{debug, info};
use num_traits::Zero;

use crate::allocation::{
    resolve_risk_tier, AllocationResolver, AppliedDelta, DeltaSource, HorizonBucket,
};
use crate::classification::{classify_behavior, classify_tier, resolve_dominant_category};
use crate::errors::{ReferenceError, Result};
use crate::events::{ClassificationRecord, ClassificationSink};
use crate::goals::GoalDefinition;
use crate::personas::{
    MatchInput, MatchOutcome, MatchingStrategy, PersonaMatch, PersonaMatcher, RuleTableMatcher,
    VectorSimilarityMatcher,
};
use crate::profile::{normalize_profile, AgeBracket, UserFinancialProfile};
use crate::reference::ReferenceData;

use super::engine_model::ClassificationResult;
use super::result_validator::validate_result;

/// Classifies profiles against one validated set of reference data.
///
/// Holds no mutable state; share it across threads behind an `Arc`.
pub struct PersonaEngine {
    reference: ReferenceData,
    primary: Box<dyn PersonaMatcher>,
    fallback: VectorSimilarityMatcher,
    resolver: AllocationResolver,
}

impl std::fmt::Debug for PersonaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonaEngine")
            .field("strategy", &self.primary.strategy())
            .field("metric", &self.fallback.metric())
            .finish()
    }
}

impl PersonaEngine {
    /// Validates the reference data and builds the matchers.
    pub fn new(reference: ReferenceData) -> Result<Self> {
        reference.validate()?;

        let fallback = VectorSimilarityMatcher::new(
            reference.personas.clone(),
            reference.tier_scores,
            reference.similarity_metric,
        );
        let primary: Box<dyn PersonaMatcher> = match reference.matching_strategy {
            MatchingStrategy::RuleTable => {
                Box::new(RuleTableMatcher::new(reference.decision_table.clone()))
            }
            MatchingStrategy::VectorSimilarity => Box::new(fallback.clone()),
        };
        let resolver = AllocationResolver::new(
            reference.allocation_bands.clone(),
            reference.bounds,
            reference.savings_adjustment,
        );

        info!(
            "Persona engine ready: strategy={} metric={} personas={}",
            reference.matching_strategy,
            reference.similarity_metric,
            reference.personas.len()
        );

        Ok(Self {
            reference,
            primary,
            fallback,
            resolver,
        })
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn strategy(&self) -> MatchingStrategy {
        self.primary.strategy()
    }

    /// Goals the catalog suggests for an age bracket.
    pub fn suggested_goals(&self, age_bracket: AgeBracket) -> Vec<&GoalDefinition> {
        self.reference.goals.suggested_goals(age_bracket)
    }

    /// Classifies a profile for the given goal.
    pub fn classify(
        &self,
        profile: &UserFinancialProfile,
        goal_id: &str,
    ) -> Result<ClassificationResult> {
        let reference = &self.reference;

        let normalized = normalize_profile(profile, &reference.normalizer)?;
        let goal = reference.goals.get(goal_id)?;

        let tier = classify_tier(
            normalized.income,
            &normalized.region,
            &reference.regions,
            &reference.tiers,
        );
        let behavior = classify_behavior(
            normalized.needs,
            normalized.wants,
            normalized.savings,
            &reference.behavior,
        );
        let dominant = resolve_dominant_category(&normalized.granular_wants);
        debug!(
            "Classified tier={} (adjusted income {:.0}) behavior={} dominant={}",
            tier.tier, tier.adjusted_income, behavior, dominant
        );

        let input = MatchInput {
            profile: &normalized,
            tier: tier.tier,
            behavior,
            dominant,
        };
        let PersonaMatch { persona_id, source } = match self.primary.match_persona(&input)? {
            MatchOutcome::Matched(matched) => matched,
            MatchOutcome::Undecided { rule_id } => {
                debug!("Rule table undecided, falling back to vector similarity");
                self.fallback.match_deferred(&input, rule_id)?
            }
        };

        let persona = reference
            .personas
            .get(&persona_id)
            .ok_or_else(|| ReferenceError::UnknownPersona(persona_id.clone()))?;

        let horizon = HorizonBucket::from_years(normalized.horizon_years);
        let risk_tier = resolve_risk_tier(
            goal.risk_tolerance,
            persona.risk_appetite,
            normalized.age_bracket,
        );

        let mut deltas = Vec::new();
        if !persona.allocation_delta.is_zero() {
            deltas.push(AppliedDelta {
                source: DeltaSource::Persona,
                reference: persona.id.clone(),
                delta: persona.allocation_delta,
            });
        }
        if !goal.allocation_delta.is_zero() {
            deltas.push(AppliedDelta {
                source: DeltaSource::Goal,
                reference: goal.id.clone(),
                delta: goal.allocation_delta,
            });
        }
        if let Some(savings_delta) = self
            .resolver
            .savings_adjustment()
            .delta_for(normalized.savings)
        {
            deltas.push(savings_delta);
        }

        let allocation = self.resolver.resolve(horizon, risk_tier, deltas)?;

        let result = ClassificationResult {
            persona_id,
            persona_name: persona.name.clone(),
            goal_id: goal.id.clone(),
            region_multiplier: tier.region_multiplier,
            adjusted_income: tier.adjusted_income,
            tier: tier.tier,
            behavior,
            dominant_category: dominant,
            match_source: source,
            allocation,
            profile: normalized,
        };
        validate_result(&result, reference)?;

        debug!(
            "Persona '{}' for goal {} ({}/{})",
            result.persona_id, result.goal_id, horizon, risk_tier
        );
        Ok(result)
    }

    /// Classifies a profile for the goal it selected itself.
    pub fn classify_selected(
        &self,
        profile: &UserFinancialProfile,
    ) -> Result<ClassificationResult> {
        self.classify(profile, &profile.goal_id)
    }

    /// Classifies and hands the outcome to `sink`. Nothing is recorded when
    /// classification fails.
    pub fn classify_and_record(
        &self,
        profile: &UserFinancialProfile,
        goal_id: &str,
        session_id: &str,
        sink: &dyn ClassificationSink,
    ) -> Result<ClassificationResult> {
        let result = self.classify(profile, goal_id)?;
        sink.record(ClassificationRecord::new(session_id, &result));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use crate::allocation::{AssetClass, RiskTier};
    use crate::classification::{AffordabilityTier, BehaviorCategory, DominantCategory};
    use crate::errors::{Error, ProfileError};
    use crate::events::MockClassificationSink;
    use crate::personas::{
        DecisionRule, DecisionTable, MatchSource, RuleOutcome, RulePredicate, SimilarityMetric,
    };
    use crate::profile::SpendCategory;
    use rust_decimal_macros::dec;

    fn engine() -> PersonaEngine {
        PersonaEngine::new(ReferenceData::default()).unwrap()
    }

    fn shopper() -> UserFinancialProfile {
        UserFinancialProfile::new(1_500_000.0, "himachal-pradesh")
            .with_shares(40.0, 45.0, 15.0)
            .with_granular(SpendCategory::Shopping, 40.0)
            .with_granular(SpendCategory::Dining, 30.0)
            .with_granular(SpendCategory::Travel, 20.0)
            .with_granular(SpendCategory::Entertainment, 10.0)
            .with_goal("FG016", 12)
    }

    #[test]
    fn test_shopping_spender_in_mid_high() {
        let result = engine().classify_selected(&shopper()).unwrap();
        assert_eq!(result.tier, AffordabilityTier::MidHigh);
        assert_eq!(result.behavior, BehaviorCategory::Spender);
        assert_eq!(result.dominant_category, DominantCategory::Shopping);
        assert_eq!(result.persona_id, "poo");
        assert_eq!(result.rule_id(), Some("mid-high-spender-shopping-heavy"));
        assert_eq!(result.allocation.weights.total(), dec!(100));
    }

    #[test]
    fn test_explicit_goal_overrides_selected_goal() {
        let result = engine().classify(&shopper(), "FG001").unwrap();
        assert_eq!(result.goal_id, "FG001");
        assert_eq!(result.allocation.horizon, HorizonBucket::Medium);
        // short-horizon essential goal, neutral persona
        assert_eq!(result.allocation.risk_tier, RiskTier::Conservative);
    }

    #[test]
    fn test_unknown_goal_is_reference_error() {
        let err = engine().classify(&shopper(), "FG999").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownReferenceData(ReferenceError::UnknownGoal(_))
        ));
    }

    #[test]
    fn test_invalid_profile_is_rejected_before_goal_lookup() {
        let profile = shopper().with_shares(60.0, 45.0, 15.0);
        let err = engine().classify(&profile, "FG999").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidProfile(ProfileError::RatioSumOutOfBounds { .. })
        ));
    }

    fn balanced_mid_high() -> UserFinancialProfile {
        UserFinancialProfile::new(1_500_000.0, "uttarakhand")
            .with_shares(50.0, 28.0, 22.0)
            .with_granular(SpendCategory::Travel, 60.0)
            .with_granular(SpendCategory::Other, 40.0)
            .with_goal("FG005", 8)
    }

    /// Default table with an UNDECIDED rule for balanced MID_HIGH profiles
    /// ahead of the tier default.
    fn deferring_reference() -> ReferenceData {
        let mut reference = ReferenceData::default();
        let mut rules = BTreeMap::new();
        for tier in AffordabilityTier::ALL {
            let mut tier_rules = reference.decision_table.rules(tier).to_vec();
            if tier == AffordabilityTier::MidHigh {
                let default_at = tier_rules.len() - 1;
                tier_rules.insert(
                    default_at,
                    DecisionRule::new(
                        "mid-high-balanced",
                        RulePredicate::behavior(BehaviorCategory::Balanced),
                        RuleOutcome::Undecided,
                    ),
                );
            }
            rules.insert(tier, tier_rules);
        }
        reference.decision_table = DecisionTable::new(rules);
        reference
    }

    #[test]
    fn test_balanced_mid_high_takes_tier_default() {
        let result = engine().classify_selected(&balanced_mid_high()).unwrap();
        assert_eq!(result.tier, AffordabilityTier::MidHigh);
        assert_eq!(result.behavior, BehaviorCategory::Balanced);
        assert_eq!(result.persona_id, "farhan");
        assert_eq!(result.rule_id(), Some("mid-high-default"));
        assert!(!result.is_fallback());
    }

    #[test]
    fn test_undecided_rule_defers_to_similarity() {
        let engine = PersonaEngine::new(deferring_reference()).unwrap();
        let result = engine.classify_selected(&balanced_mid_high()).unwrap();
        assert_eq!(result.behavior, BehaviorCategory::Balanced);
        assert!(result.is_fallback());
        match &result.match_source {
            MatchSource::Similarity {
                metric, deferred_by, ..
            } => {
                assert_eq!(*metric, SimilarityMetric::Euclidean);
                assert_eq!(deferred_by.as_deref(), Some("mid-high-balanced"));
            }
            other => panic!("unexpected source {:?}", other),
        }
        assert!(engine.reference().personas.contains(&result.persona_id));
    }

    #[test]
    fn test_vector_similarity_as_primary() {
        let reference =
            ReferenceData::default().with_matching_strategy(MatchingStrategy::VectorSimilarity);
        let engine = PersonaEngine::new(reference).unwrap();
        assert_eq!(engine.strategy(), MatchingStrategy::VectorSimilarity);
        let result = engine.classify_selected(&shopper()).unwrap();
        assert!(result.is_fallback());
    }

    #[test]
    fn test_late_career_caps_risk() {
        let profile = shopper().with_goal("FG016", 20).with_age(AgeBracket::Age60Plus);
        let result = engine().classify_selected(&profile).unwrap();
        assert_eq!(result.allocation.horizon, HorizonBucket::Long);
        assert!(result.allocation.risk_tier <= RiskTier::Moderate);
    }

    #[test]
    fn test_applied_deltas_are_reported() {
        let result = engine().classify_selected(&shopper()).unwrap();
        let sources: Vec<_> = result
            .allocation
            .applied_deltas
            .iter()
            .map(|d| d.source)
            .collect();
        // poo carries a persona delta, FG016 a goal delta, savings 15 is neutral
        assert_eq!(sources, vec![DeltaSource::Persona, DeltaSource::Goal]);
        for class in AssetClass::ALL {
            assert!(result.allocation.weights.get(class) >= dec!(0));
        }
    }

    #[test]
    fn test_classify_and_record() {
        let sink = MockClassificationSink::new();
        let engine = engine();
        let result = engine
            .classify_and_record(&shopper(), "FG016", "session-42", &sink)
            .unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session_id, "session-42");
        assert_eq!(records[0].persona_id, result.persona_id);
        assert_eq!(records[0].allocation, result.allocation.weights);

        assert!(engine
            .classify_and_record(&shopper(), "FG999", "session-43", &sink)
            .is_err());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_invalid_reference_data_fails_construction() {
        let mut reference = ReferenceData::default();
        reference.behavior.spender = f64::NAN;
        assert!(matches!(
            PersonaEngine::new(reference),
            Err(Error::InvalidConfigValue(_))
        ));
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PersonaEngine>();
    }
}
