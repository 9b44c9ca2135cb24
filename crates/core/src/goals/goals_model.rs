//! Goals domain models.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::allocation::{AssetWeights, RiskTier};
use crate::errors::{Error, ReferenceError, Result};
use crate::profile::AgeBracket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    Essential,
    Wealth,
    Lifestyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GoalPriority {
    Critical,
    High,
    Medium,
    Low,
}

/// A goal the user can select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDefinition {
    pub id: String,
    pub label: String,
    pub category: GoalCategory,
    pub priority: GoalPriority,
    /// Presentation hint such as "Short-Medium"
    pub horizon_label: String,
    /// Risk tier before persona and age adjustments
    pub risk_tolerance: RiskTier,
    #[serde(default)]
    pub allocation_delta: AssetWeights,
}

/// The goal table plus per-age-bracket suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCatalog {
    pub goals: Vec<GoalDefinition>,
    #[serde(default)]
    pub suggestions: BTreeMap<AgeBracket, Vec<String>>,
}

impl GoalCatalog {
    pub fn new(goals: Vec<GoalDefinition>, suggestions: BTreeMap<AgeBracket, Vec<String>>) -> Self {
        Self { goals, suggestions }
    }

    /// Looks up a goal; unknown ids are an error, never a default.
    pub fn get(&self, goal_id: &str) -> Result<&GoalDefinition> {
        self.goals
            .iter()
            .find(|goal| goal.id == goal_id)
            .ok_or_else(|| ReferenceError::UnknownGoal(goal_id.to_string()).into())
    }

    pub fn contains(&self, goal_id: &str) -> bool {
        self.goals.iter().any(|goal| goal.id == goal_id)
    }

    /// Goals suggested for an age bracket, in suggestion order.
    pub fn suggested_goals(&self, age_bracket: AgeBracket) -> Vec<&GoalDefinition> {
        self.suggestions
            .get(&age_bracket)
            .map(|ids| ids.iter().filter_map(|id| self.get(id).ok()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for goal in &self.goals {
            if !seen.insert(goal.id.as_str()) {
                return Err(Error::InvalidConfigValue(format!(
                    "duplicate goal id '{}'",
                    goal.id
                )));
            }
        }
        for (age_bracket, ids) in &self.suggestions {
            if let Some(unknown) = ids.iter().find(|id| !seen.contains(id.as_str())) {
                return Err(Error::InvalidConfigValue(format!(
                    "age bracket {} suggests unknown goal '{}'",
                    age_bracket, unknown
                )));
            }
        }
        Ok(())
    }
}
