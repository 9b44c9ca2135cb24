//! The single read-only configuration object consumed by the engine.

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationBandTable, AllocationBounds, SavingsRateAdjustment};
use crate::classification::{BehaviorThresholds, RegionalCostIndex, TierSettings};
use crate::errors::{Error, Result};
use crate::goals::GoalCatalog;
use crate::personas::{DecisionTable, MatchingStrategy, PersonaSet, SimilarityMetric, TierScores};
use crate::profile::NormalizerSettings;

use super::reference_defaults::{
    default_allocation_bands, default_decision_table, default_goal_catalog, default_personas,
    default_region_index,
};

/// Thresholds and tables for one engine instance.
///
/// Every section is optional in a JSON document; missing sections take the
/// built-in reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceData {
    pub normalizer: NormalizerSettings,
    pub tiers: TierSettings,
    pub behavior: BehaviorThresholds,
    pub tier_scores: TierScores,
    pub matching_strategy: MatchingStrategy,
    pub similarity_metric: SimilarityMetric,
    pub savings_adjustment: SavingsRateAdjustment,
    pub bounds: AllocationBounds,
    pub regions: RegionalCostIndex,
    pub personas: PersonaSet,
    pub decision_table: DecisionTable,
    pub allocation_bands: AllocationBandTable,
    pub goals: GoalCatalog,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            normalizer: NormalizerSettings::default(),
            tiers: TierSettings::default(),
            behavior: BehaviorThresholds::default(),
            tier_scores: TierScores::default(),
            matching_strategy: MatchingStrategy::default(),
            similarity_metric: SimilarityMetric::default(),
            savings_adjustment: SavingsRateAdjustment::default(),
            bounds: AllocationBounds::default(),
            regions: default_region_index(),
            personas: default_personas(),
            decision_table: default_decision_table(),
            allocation_bands: default_allocation_bands(),
            goals: default_goal_catalog(),
        }
    }
}

impl ReferenceData {
    /// Parses a JSON document. The result is not validated yet.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut data: ReferenceData = serde_json::from_str(json)?;
        // keys written by hand may not be slugs
        let entries: Vec<(String, f64)> = data
            .regions
            .entries()
            .map(|(region, multiplier)| (region.to_string(), multiplier))
            .collect();
        data.regions = RegionalCostIndex::new(entries);
        Ok(data)
    }

    /// Reads and parses a JSON document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        let data = Self::from_json_str(&contents)?;
        info!("Loaded reference data from {}", path.display());
        Ok(data)
    }

    pub fn with_matching_strategy(mut self, strategy: MatchingStrategy) -> Self {
        self.matching_strategy = strategy;
        self
    }

    pub fn with_similarity_metric(mut self, metric: SimilarityMetric) -> Self {
        self.similarity_metric = metric;
        self
    }

    /// Checks every threshold and table for internal consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_normalizer()?;
        self.validate_tiers()?;
        self.validate_behavior()?;
        self.validate_regions()?;
        self.tier_scores.validate()?;
        self.savings_adjustment.validate()?;
        self.bounds.validate()?;
        self.personas.validate()?;
        self.decision_table.validate(&self.personas)?;
        self.allocation_bands.validate()?;
        self.goals.validate()?;
        debug!(
            "Reference data valid: {} personas, {} goals, {} regions",
            self.personas.len(),
            self.goals.len(),
            self.regions.len()
        );
        Ok(())
    }

    fn validate_normalizer(&self) -> Result<()> {
        let settings = &self.normalizer;
        if !settings.ratio_tolerance.is_finite()
            || !settings.ratio_sanity_band.is_finite()
            || settings.ratio_tolerance < 0.0
            || settings.ratio_sanity_band < settings.ratio_tolerance
        {
            return Err(Error::InvalidConfigValue(format!(
                "normalizer tolerance {} and sanity band {} need 0 <= tolerance <= band",
                settings.ratio_tolerance, settings.ratio_sanity_band
            )));
        }
        Ok(())
    }

    fn validate_tiers(&self) -> Result<()> {
        let breakpoints = &self.tiers.breakpoints;
        if breakpoints.is_empty() {
            return Err(Error::InvalidConfigValue(
                "at least one tier breakpoint is required".to_string(),
            ));
        }
        let mut previous = 0.0;
        for breakpoint in breakpoints {
            if !breakpoint.upper_bound.is_finite() || breakpoint.upper_bound <= previous {
                return Err(Error::InvalidConfigValue(format!(
                    "tier breakpoints must be positive and strictly ascending, got {} after {}",
                    breakpoint.upper_bound, previous
                )));
            }
            previous = breakpoint.upper_bound;
        }
        let mut tiers: Vec<_> = breakpoints.iter().map(|b| b.tier).collect();
        tiers.push(self.tiers.terminal_tier);
        if tiers.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidConfigValue(
                "tiers must be listed from lowest to highest without repeats".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_behavior(&self) -> Result<()> {
        let thresholds = &self.behavior;
        if [thresholds.spender, thresholds.saver, thresholds.survivor]
            .iter()
            .any(|t| !t.is_finite())
        {
            return Err(Error::InvalidConfigValue(
                "behavior thresholds must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_regions(&self) -> Result<()> {
        if let Some((region, multiplier)) = self
            .regions
            .entries()
            .find(|(_, multiplier)| !multiplier.is_finite() || *multiplier <= 0.0)
        {
            return Err(Error::InvalidConfigValue(format!(
                "region '{}' has invalid multiplier {}",
                region, multiplier
            )));
        }
        Ok(())
    }
}
