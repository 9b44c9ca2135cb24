//! Nearest-reference-vector persona matching.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classification::AffordabilityTier;
use crate::constants::FEATURE_DIMENSIONS;
use crate::errors::{Error, Result};
use crate::profile::{NormalizedProfile, SpendCategory};

use super::personas_model::PersonaSet;
use super::personas_traits::{
    MatchInput, MatchOutcome, MatchSource, MatchingStrategy, PersonaMatch, PersonaMatcher,
    SimilarityMetric,
};

/// Numeric stand-in for each tier in the first feature dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierScores {
    /// (default: 10)
    pub low: f64,
    /// (default: 35)
    pub mid_low: f64,
    /// (default: 65)
    pub mid_high: f64,
    /// (default: 90)
    pub high: f64,
}

impl Default for TierScores {
    fn default() -> Self {
        Self {
            low: 10.0,
            mid_low: 35.0,
            mid_high: 65.0,
            high: 90.0,
        }
    }
}

impl TierScores {
    pub fn score(&self, tier: AffordabilityTier) -> f64 {
        match tier {
            AffordabilityTier::Low => self.low,
            AffordabilityTier::MidLow => self.mid_low,
            AffordabilityTier::MidHigh => self.mid_high,
            AffordabilityTier::High => self.high,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let scores = [self.low, self.mid_low, self.mid_high, self.high];
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(Error::InvalidConfigValue(
                "tier scores must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[affordability, needs, wants, savings, shopping, dining, travel,
/// entertainment, other]`
pub fn feature_vector(
    profile: &NormalizedProfile,
    tier: AffordabilityTier,
    scores: &TierScores,
) -> [f64; FEATURE_DIMENSIONS] {
    let mut features = [0.0; FEATURE_DIMENSIONS];
    features[0] = scores.score(tier);
    features[1] = profile.needs;
    features[2] = profile.wants;
    features[3] = profile.savings;
    for (offset, category) in SpendCategory::ALL.iter().enumerate() {
        features[4 + offset] = profile.granular_share(*category);
    }
    features
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity; 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Fallback (or configured primary) matcher.
///
/// Exact score ties resolve to the lexically smallest persona id.
#[derive(Debug, Clone)]
pub struct VectorSimilarityMatcher {
    personas: PersonaSet,
    scores: TierScores,
    metric: SimilarityMetric,
}

impl VectorSimilarityMatcher {
    pub fn new(personas: PersonaSet, scores: TierScores, metric: SimilarityMetric) -> Self {
        Self {
            personas,
            scores,
            metric,
        }
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    /// The winning persona id and its score.
    pub fn nearest(&self, features: &[f64]) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for persona in self.personas.iter() {
            let score = match self.metric {
                SimilarityMetric::Euclidean => {
                    euclidean_distance(features, &persona.reference_vector)
                }
                SimilarityMetric::Cosine => cosine_similarity(features, &persona.reference_vector),
            };
            let replace = match best {
                None => true,
                Some((best_id, best_score)) => {
                    let better = match self.metric {
                        SimilarityMetric::Euclidean => score < best_score,
                        SimilarityMetric::Cosine => score > best_score,
                    };
                    better || (score == best_score && persona.id.as_str() < best_id)
                }
            };
            if replace {
                best = Some((persona.id.as_str(), score));
            }
        }
        best
    }

    /// Matches and records which rule, if any, deferred to this matcher.
    pub fn match_deferred(
        &self,
        input: &MatchInput<'_>,
        deferred_by: Option<String>,
    ) -> Result<PersonaMatch> {
        let features = feature_vector(input.profile, input.tier, &self.scores);
        let (persona_id, score) = self.nearest(&features).ok_or_else(|| {
            Error::InvariantViolation("vector-similarity matcher has no personas".to_string())
        })?;
        debug!(
            "Nearest persona '{}' by {} (score {:.4})",
            persona_id, self.metric, score
        );
        Ok(PersonaMatch {
            persona_id: persona_id.to_string(),
            source: MatchSource::Similarity {
                metric: self.metric,
                score,
                deferred_by,
            },
        })
    }
}

impl PersonaMatcher for VectorSimilarityMatcher {
    fn strategy(&self) -> MatchingStrategy {
        MatchingStrategy::VectorSimilarity
    }

    fn match_persona(&self, input: &MatchInput<'_>) -> Result<MatchOutcome> {
        self.match_deferred(input, None).map(MatchOutcome::Matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AssetWeights;
    use crate::classification::{BehaviorCategory, DominantCategory};
    use crate::personas::personas_model::{PersonaDefinition, RiskAppetite};
    use crate::profile::{normalize_profile, NormalizerSettings, UserFinancialProfile};

    fn persona(id: &str, vector: [f64; 9]) -> PersonaDefinition {
        PersonaDefinition {
            id: id.to_string(),
            name: id.to_string(),
            role: String::new(),
            traits: vec![],
            risk_appetite: RiskAppetite::Neutral,
            allocation_delta: AssetWeights::default(),
            reference_vector: vector.to_vec(),
        }
    }

    fn profile() -> NormalizedProfile {
        let raw = UserFinancialProfile::new(1_500_000.0, "delhi")
            .with_shares(30.0, 50.0, 20.0)
            .with_granular(SpendCategory::Travel, 70.0)
            .with_granular(SpendCategory::Dining, 30.0);
        normalize_profile(&raw, &NormalizerSettings::default()).unwrap()
    }

    #[test]
    fn test_feature_vector_layout() {
        let features =
            feature_vector(&profile(), AffordabilityTier::MidHigh, &TierScores::default());
        assert_eq!(features, [65.0, 30.0, 50.0, 20.0, 0.0, 30.0, 70.0, 0.0, 0.0]);
    }

    #[test]
    fn test_metrics() {
        assert_eq!(euclidean_distance(&[0.0, 3.0], &[4.0, 0.0]), 5.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_euclidean_picks_nearest() {
        let matcher = VectorSimilarityMatcher::new(
            PersonaSet::new(vec![
                persona("traveler", [65.0, 30.0, 50.0, 20.0, 0.0, 30.0, 70.0, 0.0, 0.0]),
                persona("foodie", [65.0, 30.0, 50.0, 20.0, 0.0, 90.0, 10.0, 0.0, 0.0]),
            ]),
            TierScores::default(),
            SimilarityMetric::Euclidean,
        );
        let p = profile();
        let input = MatchInput {
            profile: &p,
            tier: AffordabilityTier::MidHigh,
            behavior: BehaviorCategory::Spender,
            dominant: DominantCategory::Travel,
        };
        let outcome = matcher.match_persona(&input).unwrap();
        match outcome {
            MatchOutcome::Matched(m) => {
                assert_eq!(m.persona_id, "traveler");
                assert_eq!(
                    m.source,
                    MatchSource::Similarity {
                        metric: SimilarityMetric::Euclidean,
                        score: 0.0,
                        deferred_by: None
                    }
                );
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_exact_ties_pick_lexically_smallest_id() {
        let same = [50.0; 9];
        for metric in [SimilarityMetric::Euclidean, SimilarityMetric::Cosine] {
            let matcher = VectorSimilarityMatcher::new(
                PersonaSet::new(vec![
                    persona("zeta", same),
                    persona("alpha", same),
                    persona("mu", same),
                ]),
                TierScores::default(),
                metric,
            );
            let (winner, _) = matcher.nearest(&[10.0; 9]).unwrap();
            assert_eq!(winner, "alpha");
        }
    }

    #[test]
    fn test_cosine_prefers_direction_over_magnitude() {
        let matcher = VectorSimilarityMatcher::new(
            PersonaSet::new(vec![
                persona("scaled", [20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0]),
                persona("close", [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0]),
            ]),
            TierScores::default(),
            SimilarityMetric::Cosine,
        );
        let (winner, score) = matcher.nearest(&[1.0; 9]).unwrap();
        assert_eq!(winner, "scaled");
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_persona_set_is_invariant_violation() {
        let matcher = VectorSimilarityMatcher::new(
            PersonaSet::default(),
            TierScores::default(),
            SimilarityMetric::Euclidean,
        );
        let p = profile();
        let input = MatchInput {
            profile: &p,
            tier: AffordabilityTier::Low,
            behavior: BehaviorCategory::Balanced,
            dominant: DominantCategory::None,
        };
        assert!(matches!(
            matcher.match_persona(&input),
            Err(Error::InvariantViolation(_))
        ));
    }
}
