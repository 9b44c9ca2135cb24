//! Profile validation and ratio normalization.
//!
//! The normalizer is the only stage allowed to correct input. It accepts a
//! needs/wants/savings split that is close to 100 and rescales it exactly,
//! and rescales granular "wants" shares relative to each other.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_TOTAL;
use crate::errors::{ProfileError, Result};

use super::profile_model::{NormalizedProfile, SpendCategory, UserFinancialProfile};

/// Acceptance window for the submitted needs/wants/savings split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizerSettings {
    /// Deviation from 100 treated as rounding noise (default: 0.5)
    pub ratio_tolerance: f64,

    /// Deviation from 100 still accepted after rescaling (default: 5.0)
    pub ratio_sanity_band: f64,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            ratio_tolerance: 0.5,
            ratio_sanity_band: 5.0,
        }
    }
}

fn finite(field: &str, value: f64) -> std::result::Result<f64, ProfileError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProfileError::non_finite(field))
    }
}

fn share(field: &str, value: f64) -> std::result::Result<f64, ProfileError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ProfileError::negative_share(field, value));
    }
    Ok(value)
}

/// Validates a raw profile and returns its rescaled form.
///
/// Fails with [`ProfileError`] when income is not positive, a share is
/// negative or non-finite, or the ratio sum falls outside
/// `100 ± ratio_sanity_band`.
pub fn normalize_profile(
    profile: &UserFinancialProfile,
    settings: &NormalizerSettings,
) -> Result<NormalizedProfile> {
    let income = finite("income", profile.income)?;
    if income <= 0.0 {
        return Err(ProfileError::NonPositiveIncome(income).into());
    }

    let needs = share("needs", profile.needs)?;
    let wants = share("wants", profile.wants)?;
    let savings = share("savings", profile.savings)?;

    let sum = needs + wants + savings;
    let deviation = (sum - PERCENT_TOTAL).abs();
    if deviation > settings.ratio_sanity_band {
        return Err(ProfileError::RatioSumOutOfBounds {
            sum,
            min: PERCENT_TOTAL - settings.ratio_sanity_band,
            max: PERCENT_TOTAL + settings.ratio_sanity_band,
        }
        .into());
    }
    if deviation > settings.ratio_tolerance {
        warn!(
            "Needs/wants/savings sum to {:.3}, rescaling proportionally to 100",
            sum
        );
    } else if deviation > 0.0 {
        debug!("Absorbing ratio rounding noise ({:.4})", sum - PERCENT_TOTAL);
    }

    let factor = PERCENT_TOTAL / sum;
    let granular_wants = normalize_granular(&profile.granular_wants)?;

    Ok(NormalizedProfile {
        income,
        region: profile.region.clone(),
        needs: needs * factor,
        wants: wants * factor,
        savings: savings * factor,
        granular_wants,
        goal_id: profile.goal_id.clone(),
        horizon_years: profile.horizon_years,
        age_bracket: profile.age_bracket,
        submitted_ratio_sum: sum,
    })
}

/// Rescales granular shares so they sum to 100. All-zero input stays all-zero.
fn normalize_granular(
    raw: &BTreeMap<SpendCategory, f64>,
) -> std::result::Result<BTreeMap<SpendCategory, f64>, ProfileError> {
    let mut shares = BTreeMap::new();
    for category in SpendCategory::ALL {
        let value = raw.get(&category).copied().unwrap_or(0.0);
        shares.insert(category, share(category.as_str(), value)?);
    }

    let total: f64 = shares.values().sum();
    if total > 0.0 {
        let factor = PERCENT_TOTAL / total;
        for value in shares.values_mut() {
            *value *= factor;
        }
    }
    Ok(shares)
}
