//! Seeded synthetic population, classified in parallel.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Dirichlet, Distribution};
use rayon::prelude::*;

use crate::constants::PERCENT_TOTAL;
use crate::engine::PersonaEngine;
use crate::errors::{Error, Result};
use crate::profile::{AgeBracket, SpendCategory, UserFinancialProfile};
use crate::reference::ReferenceData;

use super::simulation_model::{PersonaDistribution, SimulationConfig};

/// (probability, lower bound, width) of each income band
const INCOME_MIXTURE: [(f64, f64, f64); 4] = [
    (0.20, 300_000.0, 300_000.0),
    (0.35, 600_000.0, 600_000.0),
    (0.30, 1_200_000.0, 1_300_000.0),
    (0.15, 2_500_000.0, 5_000_000.0),
];

const MAX_HORIZON_YEARS: u32 = 25;

/// splitmix64 over (seed, index) so neighbouring members get unrelated streams.
fn member_seed(seed: u64, index: usize) -> u64 {
    let mut z = seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn sample_income(rng: &mut StdRng) -> f64 {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (probability, lower, width) in INCOME_MIXTURE {
        cumulative += probability;
        if roll < cumulative {
            return lower + rng.gen::<f64>() * width;
        }
    }
    let (_, lower, width) = INCOME_MIXTURE[INCOME_MIXTURE.len() - 1];
    lower + rng.gen::<f64>() * width
}

/// Draws the whole population from reference data.
pub struct PopulationGenerator<'a> {
    regions: Vec<&'a str>,
    goal_ids: Vec<&'a str>,
    granular: Dirichlet<f64>,
    seed: u64,
}

impl<'a> PopulationGenerator<'a> {
    pub fn new(reference: &'a ReferenceData, seed: u64) -> Result<Self> {
        let regions: Vec<&str> = reference.regions.regions().collect();
        let goal_ids: Vec<&str> = reference.goals.goals.iter().map(|g| g.id.as_str()).collect();
        if regions.is_empty() || goal_ids.is_empty() {
            return Err(Error::InvalidConfigValue(
                "simulation needs at least one region and one goal".to_string(),
            ));
        }
        let granular = Dirichlet::new(&[1.0; 5])
            .map_err(|e| Error::InvalidConfigValue(format!("dirichlet: {}", e)))?;
        Ok(Self {
            regions,
            goal_ids,
            granular,
            seed,
        })
    }

    /// Member `index`; identical for a given seed whatever order members
    /// are generated in.
    pub fn member(&self, index: usize) -> UserFinancialProfile {
        let mut rng = StdRng::seed_from_u64(member_seed(self.seed, index));

        let income = sample_income(&mut rng);
        let region = self.regions.choose(&mut rng).copied().unwrap_or_default();
        let needs = rng.gen_range(30.0..80.0);
        let wants = rng.gen::<f64>() * (PERCENT_TOTAL - needs);
        let savings = PERCENT_TOTAL - needs - wants;

        let mut profile =
            UserFinancialProfile::new(income, region).with_shares(needs, wants, savings);
        let shares = self.granular.sample(&mut rng);
        for (category, share) in SpendCategory::ALL.iter().zip(shares) {
            profile = profile.with_granular(*category, share * PERCENT_TOTAL);
        }

        let goal_id = self.goal_ids.choose(&mut rng).copied().unwrap_or_default();
        let horizon_years = rng.gen_range(1..=MAX_HORIZON_YEARS);
        let age_bracket = AgeBracket::ALL
            .choose(&mut rng)
            .copied()
            .unwrap_or(AgeBracket::Age29To39);

        profile.with_goal(goal_id, horizon_years).with_age(age_bracket)
    }
}

/// Generates the population described by `config`.
pub fn generate_population(
    reference: &ReferenceData,
    config: &SimulationConfig,
) -> Result<Vec<UserFinancialProfile>> {
    let generator = PopulationGenerator::new(reference, config.seed)?;
    Ok((0..config.population).map(|i| generator.member(i)).collect())
}

#[derive(Default)]
struct Tally {
    counts: HashMap<String, usize>,
    fallback: usize,
    failures: usize,
}

impl Tally {
    fn merge(mut self, other: Tally) -> Tally {
        for (persona, count) in other.counts {
            *self.counts.entry(persona).or_insert(0) += count;
        }
        self.fallback += other.fallback;
        self.failures += other.failures;
        self
    }
}

/// Classifies a seeded synthetic population and aggregates the result.
///
/// The distribution depends only on the engine's reference data and
/// `config`, not on how many worker threads rayon uses.
pub fn run_simulation(
    engine: &PersonaEngine,
    config: &SimulationConfig,
) -> Result<PersonaDistribution> {
    if config.population == 0 {
        return Err(Error::InvalidConfigValue(
            "simulation population must be positive".to_string(),
        ));
    }
    let generator = PopulationGenerator::new(engine.reference(), config.seed)?;

    info!(
        "Simulating {} users (seed {})",
        config.population, config.seed
    );

    let tally = (0..config.population)
        .into_par_iter()
        .fold(Tally::default, |mut tally, index| {
            let profile = generator.member(index);
            match engine.classify_selected(&profile) {
                Ok(result) => {
                    if result.is_fallback() {
                        tally.fallback += 1;
                    }
                    *tally.counts.entry(result.persona_id).or_insert(0) += 1;
                }
                Err(e) => {
                    debug!("Simulated member {} failed: {}", index, e);
                    tally.failures += 1;
                }
            }
            tally
        })
        .reduce(Tally::default, Tally::merge);

    Ok(summarize(engine.reference(), config.population, tally))
}

fn summarize(reference: &ReferenceData, total: usize, tally: Tally) -> PersonaDistribution {
    let counts: BTreeMap<String, usize> = reference
        .personas
        .ids()
        .map(|id| (id.to_string(), tally.counts.get(id).copied().unwrap_or(0)))
        .collect();

    let classified = total - tally.failures;
    let shares: BTreeMap<String, f64> = counts
        .iter()
        .map(|(id, count)| {
            let share = if classified == 0 {
                0.0
            } else {
                *count as f64 / classified as f64 * PERCENT_TOTAL
            };
            (id.clone(), share)
        })
        .collect();

    let values: Vec<f64> = shares.values().copied().collect();
    let (spread, std_dev) = if values.is_empty() {
        (0.0, 0.0)
    } else {
        let max = values.iter().copied().fold(f64::MIN, f64::max);
        let min = values.iter().copied().fold(f64::MAX, f64::min);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance =
            values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
        (max - min, variance.sqrt())
    };

    PersonaDistribution {
        total,
        counts,
        fallback_count: tally.fallback,
        failures: tally.failures,
        shares,
        spread,
        std_dev,
    }
}
