//! Persona matcher abstraction.
//!
//! Two strategies implement [`PersonaMatcher`]:
//! - `RuleTableMatcher` - ordered, tier-partitioned decision rules
//! - `VectorSimilarityMatcher` - nearest reference vector

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classification::{AffordabilityTier, BehaviorCategory, DominantCategory};
use crate::errors::{Error, Result};
use crate::profile::NormalizedProfile;

// =============================================================================
// Strategy identifiers
// =============================================================================

/// Which matcher decides first.
///
/// With `RuleTable`, the vector-similarity matcher handles undecided
/// profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchingStrategy {
    #[default]
    RuleTable,
    VectorSimilarity,
}

impl MatchingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingStrategy::RuleTable => "rule-table",
            MatchingStrategy::VectorSimilarity => "vector-similarity",
        }
    }
}

impl FromStr for MatchingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "rule-table" => Ok(MatchingStrategy::RuleTable),
            "vector-similarity" => Ok(MatchingStrategy::VectorSimilarity),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown matching strategy '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MatchingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Distance measure used by the vector-similarity matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Smallest distance wins
    #[default]
    Euclidean,
    /// Largest similarity wins
    Cosine,
}

impl SimilarityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Euclidean => "euclidean",
            SimilarityMetric::Cosine => "cosine",
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "euclidean" => Ok(SimilarityMetric::Euclidean),
            "cosine" => Ok(SimilarityMetric::Cosine),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown similarity metric '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Match input and output
// =============================================================================

/// Everything the earlier pipeline stages produced for one profile.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    pub profile: &'a NormalizedProfile,
    pub tier: AffordabilityTier,
    pub behavior: BehaviorCategory,
    pub dominant: DominantCategory,
}

/// How a persona was chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MatchSource {
    /// A decision rule fired
    #[serde(rename_all = "camelCase")]
    Rule { rule_id: String },

    /// Nearest reference vector. `score` is the distance (Euclidean) or
    /// similarity (cosine) to the winner.
    #[serde(rename_all = "camelCase")]
    Similarity {
        metric: SimilarityMetric,
        score: f64,
        /// The rule that handed over the decision, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deferred_by: Option<String>,
    },
}

impl MatchSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, MatchSource::Similarity { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaMatch {
    pub persona_id: String,
    pub source: MatchSource,
}

/// Result of one matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(PersonaMatch),
    /// No persona was decided. `rule_id` names the rule that emitted the
    /// undecided sentinel, or is `None` when no rule matched at all.
    Undecided { rule_id: Option<String> },
}

// =============================================================================
// Matcher trait
// =============================================================================

/// A strategy that maps classifier labels and ratios to a persona.
///
/// Implementations are pure: the same input always yields the same outcome.
pub trait PersonaMatcher: Send + Sync {
    fn strategy(&self) -> MatchingStrategy;

    fn match_persona(&self, input: &MatchInput<'_>) -> Result<MatchOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "rule-table".parse::<MatchingStrategy>().unwrap(),
            MatchingStrategy::RuleTable
        );
        assert_eq!(
            " Vector-Similarity ".parse::<MatchingStrategy>().unwrap(),
            MatchingStrategy::VectorSimilarity
        );
        assert!("nearest".parse::<MatchingStrategy>().is_err());
        assert_eq!(
            serde_json::to_string(&MatchingStrategy::VectorSimilarity).unwrap(),
            "\"vector-similarity\""
        );
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("COSINE".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Cosine);
        assert!("manhattan".parse::<SimilarityMetric>().is_err());
    }

    #[test]
    fn test_match_source_serialization() {
        let source = MatchSource::Rule {
            rule_id: "high-spender-shopping".to_string(),
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["kind"], "rule");
        assert_eq!(json["ruleId"], "high-spender-shopping");
        assert!(!source.is_fallback());

        let source = MatchSource::Similarity {
            metric: SimilarityMetric::Cosine,
            score: 0.5,
            deferred_by: None,
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["kind"], "similarity");
        assert_eq!(json["metric"], "cosine");
        assert!(json.get("deferredBy").is_none());
        assert!(source.is_fallback());
    }
}
