use std::path::PathBuf;

use anyhow::Context;
use finpersona_core::personas::{MatchingStrategy, SimilarityMetric};
use finpersona_core::simulation::SimulationConfig;

/// Simulator settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub simulation: SimulationConfig,
    /// JSON reference data; the built-in tables are used when unset
    pub reference_path: Option<PathBuf>,
    pub matching_strategy: Option<MatchingStrategy>,
    pub similarity_metric: Option<SimilarityMetric>,
    /// Print the distribution as JSON instead of a table
    pub json_output: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SimulationConfig::default();

        let population = match lookup("PF_SIM_POPULATION") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("PF_SIM_POPULATION must be an integer, got '{}'", raw))?,
            None => defaults.population,
        };
        let seed = match lookup("PF_SIM_SEED") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("PF_SIM_SEED must be an integer, got '{}'", raw))?,
            None => defaults.seed,
        };

        let matching_strategy = lookup("PF_MATCH_STRATEGY")
            .map(|raw| raw.parse::<MatchingStrategy>())
            .transpose()
            .context("PF_MATCH_STRATEGY")?;
        let similarity_metric = lookup("PF_SIMILARITY_METRIC")
            .map(|raw| raw.parse::<SimilarityMetric>())
            .transpose()
            .context("PF_SIMILARITY_METRIC")?;

        let json_output = lookup("PF_SIM_OUTPUT")
            .map(|raw| raw.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            simulation: SimulationConfig { population, seed },
            reference_path: lookup("PF_REFERENCE_DATA")
                .filter(|raw| !raw.trim().is_empty())
                .map(PathBuf::from),
            matching_strategy,
            similarity_metric,
            json_output,
        })
    }
}
