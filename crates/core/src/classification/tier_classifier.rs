//! Affordability tier classification.
//!
//! Income is divided by the region's cost-of-living multiplier and bucketed
//! against a single ascending list of breakpoints.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REGION_MULTIPLIER;

use super::classification_model::{AffordabilityTier, TierAssessment};

/// Region identifier → cost-of-living multiplier.
///
/// Keys are stored as slugs (see [`region_slug`]). Regions that are not in
/// the index resolve to a neutral multiplier; regional cost data is advisory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionalCostIndex(BTreeMap<String, f64>);

impl RegionalCostIndex {
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .map(|(region, multiplier)| (region_slug(region.as_ref()), multiplier))
                .collect(),
        )
    }

    /// Returns the multiplier for a region, or the neutral multiplier if unknown.
    pub fn multiplier(&self, region: &str) -> f64 {
        match self.0.get(&region_slug(region)) {
            Some(multiplier) => *multiplier,
            None => {
                debug!(
                    "Region '{}' not in cost index, using multiplier {}",
                    region, DEFAULT_REGION_MULTIPLIER
                );
                DEFAULT_REGION_MULTIPLIER
            }
        }
    }

    pub fn contains(&self, region: &str) -> bool {
        self.0.contains_key(&region_slug(region))
    }

    /// Region slugs in lexical order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(region, multiplier)| (region.as_str(), *multiplier))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Canonical form of a region identifier: lowercase, whitespace runs and
/// underscores become `-`, `&` becomes `and`.
pub fn region_slug(region: &str) -> String {
    region
        .trim()
        .to_lowercase()
        .replace('&', "and")
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Upper bound (exclusive) of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBreakpoint {
    pub tier: AffordabilityTier,
    pub upper_bound: f64,
}

/// Ascending breakpoints plus the tier used above the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSettings {
    pub breakpoints: Vec<TierBreakpoint>,
    pub terminal_tier: AffordabilityTier,
}

impl Default for TierSettings {
    fn default() -> Self {
        Self {
            breakpoints: vec![
                TierBreakpoint {
                    tier: AffordabilityTier::Low,
                    upper_bound: 600_000.0,
                },
                TierBreakpoint {
                    tier: AffordabilityTier::MidLow,
                    upper_bound: 1_200_000.0,
                },
                TierBreakpoint {
                    tier: AffordabilityTier::MidHigh,
                    upper_bound: 2_500_000.0,
                },
            ],
            terminal_tier: AffordabilityTier::High,
        }
    }
}

/// Buckets an adjusted income: the first breakpoint it is strictly below,
/// else the terminal tier.
pub fn tier_for_adjusted_income(
    adjusted_income: f64,
    settings: &TierSettings,
) -> AffordabilityTier {
    settings
        .breakpoints
        .iter()
        .find(|breakpoint| adjusted_income < breakpoint.upper_bound)
        .map(|breakpoint| breakpoint.tier)
        .unwrap_or(settings.terminal_tier)
}

/// Adjusts income for the region and classifies it.
pub fn classify_tier(
    income: f64,
    region: &str,
    cost_index: &RegionalCostIndex,
    settings: &TierSettings,
) -> TierAssessment {
    let region_multiplier = cost_index.multiplier(region);
    let adjusted_income = income / region_multiplier;
    TierAssessment {
        region_multiplier,
        adjusted_income,
        tier: tier_for_adjusted_income(adjusted_income, settings),
    }
}
