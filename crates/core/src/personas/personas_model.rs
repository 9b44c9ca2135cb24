//! Persona definitions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::allocation::AssetWeights;
use crate::constants::FEATURE_DIMENSIONS;
use crate::errors::{Error, Result};

/// How a persona's appetite for risk moves the goal's declared risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskAppetite {
    Averse,
    Neutral,
    Seeking,
}

/// A behavioral archetype.
///
/// `name`, `role` and `traits` are presentation only. `reference_vector` is
/// read exclusively by the vector-similarity matcher and follows the feature
/// order `[affordability, needs, wants, savings, shopping, dining, travel,
/// entertainment, other]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub traits: Vec<String>,
    pub risk_appetite: RiskAppetite,
    #[serde(default)]
    pub allocation_delta: AssetWeights,
    pub reference_vector: Vec<f64>,
}

/// The closed set of personas the matchers may return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaSet(Vec<PersonaDefinition>);

impl PersonaSet {
    pub fn new(personas: Vec<PersonaDefinition>) -> Self {
        Self(personas)
    }

    pub fn get(&self, id: &str) -> Option<&PersonaDefinition> {
        self.0.iter().find(|persona| persona.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonaDefinition> {
        self.0.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|persona| persona.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rejects empty sets, duplicate ids and malformed reference vectors.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::InvalidConfigValue(
                "persona set must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for persona in &self.0 {
            if persona.id.trim().is_empty() {
                return Err(Error::InvalidConfigValue(
                    "persona id must not be blank".to_string(),
                ));
            }
            if !seen.insert(persona.id.as_str()) {
                return Err(Error::InvalidConfigValue(format!(
                    "duplicate persona id '{}'",
                    persona.id
                )));
            }
            if persona.reference_vector.len() != FEATURE_DIMENSIONS {
                return Err(Error::InvalidConfigValue(format!(
                    "persona '{}' has a {}-dimensional reference vector, expected {}",
                    persona.id,
                    persona.reference_vector.len(),
                    FEATURE_DIMENSIONS
                )));
            }
            if persona.reference_vector.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidConfigValue(format!(
                    "persona '{}' has a non-finite reference vector component",
                    persona.id
                )));
            }
        }
        Ok(())
    }
}
