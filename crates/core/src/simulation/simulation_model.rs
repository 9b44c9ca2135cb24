//! Population simulation models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Size and seed of a synthetic population run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Number of synthetic users (default: 10000)
    pub population: usize,

    /// Base seed; member `i` draws from its own generator seeded by
    /// `(seed, i)` (default: 42)
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: 10_000,
            seed: 42,
        }
    }
}

/// How a simulated population spread over the personas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDistribution {
    pub total: usize,
    /// Every persona appears, including those with zero members
    pub counts: BTreeMap<String, usize>,
    /// Members matched by vector similarity
    pub fallback_count: usize,
    /// Members whose classification returned an error
    pub failures: usize,
    /// Percentage of classified members per persona
    pub shares: BTreeMap<String, f64>,
    /// Largest share minus smallest share
    pub spread: f64,
    /// Population standard deviation of `shares`
    pub std_dev: f64,
}

impl PersonaDistribution {
    pub fn classified(&self) -> usize {
        self.total - self.failures
    }

    pub fn share(&self, persona_id: &str) -> f64 {
        self.shares.get(persona_id).copied().unwrap_or(0.0)
    }

    /// Personas ordered by member count, largest first; ties by id.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self
            .counts
            .iter()
            .map(|(persona, count)| (persona.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}
