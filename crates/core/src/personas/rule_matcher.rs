//! Tier-partitioned decision table, evaluated first-match-wins.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classification::{AffordabilityTier, BehaviorCategory, DominantCategory};
use crate::errors::{Error, Result};
use crate::profile::{NormalizedProfile, SpendCategory};

use super::personas_model::PersonaSet;
use super::personas_traits::{
    MatchInput, MatchOutcome, MatchSource, MatchingStrategy, PersonaMatch, PersonaMatcher,
};

/// A normalized share a rule can compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareMetric {
    Needs,
    Wants,
    Savings,
    /// Share of the wants bucket spent on one sub-category
    Granular(SpendCategory),
}

impl ShareMetric {
    pub fn read(&self, profile: &NormalizedProfile) -> f64 {
        match self {
            ShareMetric::Needs => profile.needs,
            ShareMetric::Wants => profile.wants,
            ShareMetric::Savings => profile.savings,
            ShareMetric::Granular(category) => profile.granular_share(*category),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
}

impl Comparison {
    pub fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Gt => left > right,
            Comparison::Gte => left >= right,
            Comparison::Lt => left < right,
            Comparison::Lte => left <= right,
        }
    }
}

/// `metric op value`, e.g. savings > 50.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCondition {
    pub metric: ShareMetric,
    pub op: Comparison,
    pub value: f64,
}

impl ShareCondition {
    pub fn new(metric: ShareMetric, op: Comparison, value: f64) -> Self {
        Self { metric, op, value }
    }

    pub fn holds(&self, profile: &NormalizedProfile) -> bool {
        self.op.holds(self.metric.read(profile), self.value)
    }
}

/// Conjunction of optional conditions. An empty predicate always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulePredicate {
    pub behavior: Option<BehaviorCategory>,
    pub dominant: Option<DominantCategory>,
    pub conditions: Vec<ShareCondition>,
}

impl RulePredicate {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn behavior(behavior: BehaviorCategory) -> Self {
        Self {
            behavior: Some(behavior),
            ..Default::default()
        }
    }

    pub fn with_dominant(mut self, dominant: DominantCategory) -> Self {
        self.dominant = Some(dominant);
        self
    }

    pub fn with_condition(mut self, metric: ShareMetric, op: Comparison, value: f64) -> Self {
        self.conditions.push(ShareCondition::new(metric, op, value));
        self
    }

    pub fn is_unconditional(&self) -> bool {
        self.behavior.is_none() && self.dominant.is_none() && self.conditions.is_empty()
    }

    pub fn holds(&self, input: &MatchInput<'_>) -> bool {
        if let Some(behavior) = self.behavior {
            if behavior != input.behavior {
                return false;
            }
        }
        if let Some(dominant) = self.dominant {
            if dominant != input.dominant {
                return false;
            }
        }
        self.conditions
            .iter()
            .all(|condition| condition.holds(input.profile))
    }
}

/// What a rule decides when its predicate holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleOutcome {
    Persona(String),
    /// Defer to the vector-similarity matcher
    #[serde(rename = "UNDECIDED")]
    Undecided,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRule {
    pub id: String,
    #[serde(default)]
    pub predicate: RulePredicate,
    pub outcome: RuleOutcome,
}

impl DecisionRule {
    pub fn new(id: impl Into<String>, predicate: RulePredicate, outcome: RuleOutcome) -> Self {
        Self {
            id: id.into(),
            predicate,
            outcome,
        }
    }

    pub fn persona(id: impl Into<String>, predicate: RulePredicate, persona: &str) -> Self {
        Self::new(id, predicate, RuleOutcome::Persona(persona.to_string()))
    }
}

/// Ordered rule lists keyed by affordability tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionTable(BTreeMap<AffordabilityTier, Vec<DecisionRule>>);

impl DecisionTable {
    pub fn new(rules: BTreeMap<AffordabilityTier, Vec<DecisionRule>>) -> Self {
        Self(rules)
    }

    pub fn rules(&self, tier: AffordabilityTier) -> &[DecisionRule] {
        self.0.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first rule whose predicate holds.
    pub fn first_match(&self, input: &MatchInput<'_>) -> Option<&DecisionRule> {
        self.rules(input.tier)
            .iter()
            .find(|rule| rule.predicate.holds(input))
    }

    /// Checks coverage, reachability and persona membership.
    pub fn validate(&self, personas: &PersonaSet) -> Result<()> {
        let mut rule_ids = HashSet::new();

        for tier in AffordabilityTier::ALL {
            let rules = self.rules(tier);
            if rules.is_empty() {
                return Err(Error::InvalidConfigValue(format!(
                    "decision table has no rules for tier {}",
                    tier
                )));
            }

            let mut catch_all: Option<&str> = None;
            for rule in rules {
                if let Some(previous) = catch_all {
                    return Err(Error::InvalidConfigValue(format!(
                        "rule '{}' in tier {} is unreachable after always-true rule '{}'",
                        rule.id, tier, previous
                    )));
                }
                if !rule_ids.insert(rule.id.as_str()) {
                    return Err(Error::InvalidConfigValue(format!(
                        "duplicate rule id '{}'",
                        rule.id
                    )));
                }
                if let RuleOutcome::Persona(persona_id) = &rule.outcome {
                    if !personas.contains(persona_id) {
                        return Err(Error::InvalidConfigValue(format!(
                            "rule '{}' names unknown persona '{}'",
                            rule.id, persona_id
                        )));
                    }
                }
                if rule
                    .predicate
                    .conditions
                    .iter()
                    .any(|condition| !condition.value.is_finite())
                {
                    return Err(Error::InvalidConfigValue(format!(
                        "rule '{}' compares against a non-finite value",
                        rule.id
                    )));
                }
                if rule.predicate.is_unconditional() {
                    catch_all = Some(rule.id.as_str());
                }
            }
        }
        Ok(())
    }
}

/// Primary matcher: walks the tier's rules in order.
#[derive(Debug, Clone)]
pub struct RuleTableMatcher {
    table: DecisionTable,
}

impl RuleTableMatcher {
    pub fn new(table: DecisionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &DecisionTable {
        &self.table
    }
}

impl PersonaMatcher for RuleTableMatcher {
    fn strategy(&self) -> MatchingStrategy {
        MatchingStrategy::RuleTable
    }

    fn match_persona(&self, input: &MatchInput<'_>) -> Result<MatchOutcome> {
        let Some(rule) = self.table.first_match(input) else {
            debug!(
                "No rule matched tier={} behavior={} dominant={}",
                input.tier, input.behavior, input.dominant
            );
            return Ok(MatchOutcome::Undecided { rule_id: None });
        };

        debug!("Rule '{}' matched tier={}", rule.id, input.tier);
        Ok(match &rule.outcome {
            RuleOutcome::Persona(persona_id) => MatchOutcome::Matched(PersonaMatch {
                persona_id: persona_id.clone(),
                source: MatchSource::Rule {
                    rule_id: rule.id.clone(),
                },
            }),
            RuleOutcome::Undecided => MatchOutcome::Undecided {
                rule_id: Some(rule.id.clone()),
            },
        })
    }
}
