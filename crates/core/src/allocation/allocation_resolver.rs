//! Goal-allocation resolution.
//!
//! Band midpoints plus additive deltas, clamped to global bounds and
//! renormalized so the classes sum to exactly 100.

use std::collections::BTreeSet;

use log::{debug, error};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::ALLOCATION_DECIMAL_PRECISION;
use crate::errors::{Error, Result};
use crate::personas::RiskAppetite;
use crate::profile::AgeBracket;

use super::allocation_model::{
    AllocationBandTable, AllocationBounds, AllocationResult, AppliedDelta, AssetClass,
    AssetWeights, DeltaSource, HorizonBucket, RiskTier,
};

const HUNDRED: Decimal = dec!(100);

/// Allocation tilt driven by the normalized savings share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRateAdjustment {
    /// savings above this applies `high_savings_delta` (default: 30)
    pub high_savings_threshold: f64,

    /// savings below this applies `low_savings_delta` (default: 15)
    pub low_savings_threshold: f64,

    /// (default: equity +5, fixed deposit -5)
    pub high_savings_delta: AssetWeights,

    /// (default: equity -5, fixed deposit +5)
    pub low_savings_delta: AssetWeights,
}

impl Default for SavingsRateAdjustment {
    fn default() -> Self {
        Self {
            high_savings_threshold: 30.0,
            low_savings_threshold: 15.0,
            high_savings_delta: AssetWeights {
                equity: dec!(5),
                fixed_deposit: dec!(-5),
                ..Default::default()
            },
            low_savings_delta: AssetWeights {
                equity: dec!(-5),
                fixed_deposit: dec!(5),
                ..Default::default()
            },
        }
    }
}

impl SavingsRateAdjustment {
    pub fn delta_for(&self, savings: f64) -> Option<AppliedDelta> {
        let (reference, delta) = if savings > self.high_savings_threshold {
            ("HIGH_SAVINGS", self.high_savings_delta)
        } else if savings < self.low_savings_threshold {
            ("LOW_SAVINGS", self.low_savings_delta)
        } else {
            return None;
        };
        Some(AppliedDelta {
            source: DeltaSource::SavingsRate,
            reference: reference.to_string(),
            delta,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.high_savings_threshold.is_finite()
            || !self.low_savings_threshold.is_finite()
            || self.low_savings_threshold > self.high_savings_threshold
        {
            return Err(Error::InvalidConfigValue(format!(
                "savings-rate thresholds must be finite and ordered, got low={} high={}",
                self.low_savings_threshold, self.high_savings_threshold
            )));
        }
        Ok(())
    }
}

/// Goal tolerance, moved one step by the persona's appetite, then capped at
/// MODERATE for late-career age brackets.
pub fn resolve_risk_tier(declared: RiskTier, appetite: RiskAppetite, age: AgeBracket) -> RiskTier {
    let stepped = match appetite {
        RiskAppetite::Averse => declared.step_down(),
        RiskAppetite::Neutral => declared,
        RiskAppetite::Seeking => declared.step_up(),
    };
    if age.is_late_career() {
        stepped.min(RiskTier::Moderate)
    } else {
        stepped
    }
}

/// Clamps every class into its bound.
pub fn clamp_to_bounds(weights: &AssetWeights, bounds: &AllocationBounds) -> AssetWeights {
    let mut clamped = *weights;
    for class in AssetClass::ALL {
        clamped.set(class, bounds.range(class).clamp(weights.get(class)));
    }
    clamped
}

fn violation(message: String, clamped: &AssetWeights, bounds: &AllocationBounds) -> Error {
    error!(
        "Invariant violation: {}. Clamped: {:?}. Bounds: {:?}",
        message, clamped, bounds
    );
    Error::InvariantViolation(message)
}

/// Scales clamped weights to sum to 100 without leaving the bounds.
///
/// Classes that would cross a bound are pinned at it and the remaining
/// classes rescaled. The result is rounded to four decimals; the rounding
/// residual goes to the largest class that can absorb it.
pub fn renormalize(clamped: &AssetWeights, bounds: &AllocationBounds) -> Result<AssetWeights> {
    if clamped.total() <= Decimal::ZERO {
        return Err(violation(
            format!("clamped allocation sums to {}, cannot renormalize", clamped.total()),
            clamped,
            bounds,
        ));
    }

    let mut result = *clamped;
    let mut pinned: BTreeSet<AssetClass> = BTreeSet::new();

    for _ in 0..=AssetClass::ALL.len() {
        let free: Vec<AssetClass> = AssetClass::ALL
            .into_iter()
            .filter(|class| !pinned.contains(class))
            .collect();
        let pinned_total: Decimal = pinned.iter().map(|class| result.get(*class)).sum();
        let target = HUNDRED - pinned_total;

        if free.is_empty() {
            if target.is_zero() {
                break;
            }
            return Err(violation(
                format!("allocation bounds leave {} unassigned", target),
                clamped,
                bounds,
            ));
        }

        let free_total: Decimal = free.iter().map(|class| clamped.get(*class)).sum();
        if free_total.is_zero() {
            // Nothing to scale: start every free class at its floor and
            // spread what is left by headroom above the floor.
            let floors: Decimal = free.iter().map(|class| bounds.range(*class).min).sum();
            let headroom: Decimal = free
                .iter()
                .map(|class| {
                    let range = bounds.range(*class);
                    range.max - range.min
                })
                .sum();
            let remaining = target - floors;
            if headroom.is_zero() {
                if !remaining.is_zero() {
                    return Err(violation(
                        format!("no headroom left to place {} of the allocation", remaining),
                        clamped,
                        bounds,
                    ));
                }
                for class in &free {
                    result.set(*class, bounds.range(*class).min);
                }
                break;
            }
            for class in &free {
                let range = bounds.range(*class);
                result.set(*class, range.min + (range.max - range.min) * remaining / headroom);
            }
            break;
        }

        let scale = target / free_total;
        let mut newly_pinned = false;
        for class in &free {
            let range = bounds.range(*class);
            let scaled = clamped.get(*class) * scale;
            if scaled > range.max {
                result.set(*class, range.max);
                pinned.insert(*class);
                newly_pinned = true;
            } else if scaled < range.min {
                result.set(*class, range.min);
                pinned.insert(*class);
                newly_pinned = true;
            } else {
                result.set(*class, scaled);
            }
        }
        if !newly_pinned {
            break;
        }
    }

    Ok(round_with_residual(&result, bounds))
}

fn round_with_residual(weights: &AssetWeights, bounds: &AllocationBounds) -> AssetWeights {
    let mut rounded = *weights;
    for class in AssetClass::ALL {
        rounded.set(class, weights.get(class).round_dp(ALLOCATION_DECIMAL_PRECISION));
    }

    let residual = HUNDRED - rounded.total();
    if residual.is_zero() {
        return rounded;
    }

    let mut candidates: Vec<AssetClass> = AssetClass::ALL.to_vec();
    candidates.sort_by(|a, b| rounded.get(*b).cmp(&rounded.get(*a)));
    let target = candidates
        .iter()
        .copied()
        .find(|class| bounds.range(*class).contains(rounded.get(*class) + residual))
        .unwrap_or_else(|| rounded.largest_class());
    rounded.set(target, rounded.get(target) + residual);
    rounded
}

/// Resolves target allocations against one band table and bound set.
#[derive(Debug, Clone)]
pub struct AllocationResolver {
    bands: AllocationBandTable,
    bounds: AllocationBounds,
    savings_adjustment: SavingsRateAdjustment,
}

impl AllocationResolver {
    pub fn new(
        bands: AllocationBandTable,
        bounds: AllocationBounds,
        savings_adjustment: SavingsRateAdjustment,
    ) -> Self {
        Self {
            bands,
            bounds,
            savings_adjustment,
        }
    }

    pub fn bounds(&self) -> &AllocationBounds {
        &self.bounds
    }

    pub fn savings_adjustment(&self) -> &SavingsRateAdjustment {
        &self.savings_adjustment
    }

    /// Applies `deltas` to the midpoints of the (horizon, risk) band.
    pub fn resolve(
        &self,
        horizon: HorizonBucket,
        risk_tier: RiskTier,
        deltas: Vec<AppliedDelta>,
    ) -> Result<AllocationResult> {
        let band = self.bands.get(horizon, risk_tier)?;
        let base = band.midpoints();
        let adjusted = deltas.iter().fold(base, |acc, d| acc + d.delta);
        let clamped = clamp_to_bounds(&adjusted, &self.bounds);
        let weights = renormalize(&clamped, &self.bounds).map_err(|e| {
            error!(
                "Allocation {}/{} failed: base={:?} deltas={:?} adjusted={:?}",
                horizon, risk_tier, base, deltas, adjusted
            );
            e
        })?;

        debug!(
            "Allocation {}/{}: base={:?} adjusted={:?} final={:?}",
            horizon, risk_tier, base, adjusted, weights
        );

        Ok(AllocationResult {
            horizon,
            risk_tier,
            weights,
            base,
            adjusted,
            applied_deltas: deltas,
            expected_return: band.expected_return.clone(),
            rebalance_frequency: band.rebalance_frequency.clone(),
            instruments: band.instruments.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::allocation_model::{AllocationBand, PercentRange};

    fn long_aggressive() -> AllocationBand {
        AllocationBand {
            horizon: HorizonBucket::Long,
            risk: RiskTier::Aggressive,
            liquid: PercentRange::new(dec!(0), dec!(5)),
            fixed_deposit: PercentRange::new(dec!(0), dec!(10)),
            gold: PercentRange::new(dec!(0), dec!(5)),
            equity: PercentRange::new(dec!(75), dec!(95)),
            expected_return: "14-16%".to_string(),
            rebalance_frequency: "Annually".to_string(),
            instruments: vec!["Small Cap Fund".to_string()],
        }
    }

    fn resolver() -> AllocationResolver {
        AllocationResolver::new(
            AllocationBandTable::new(vec![long_aggressive()]),
            AllocationBounds::default(),
            SavingsRateAdjustment::default(),
        )
    }

    fn equity_delta(equity: Decimal) -> AppliedDelta {
        AppliedDelta {
            source: DeltaSource::Persona,
            reference: "test".to_string(),
            delta: AssetWeights {
                equity,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_negative_equity_delta_on_aggressive_band() {
        let result = resolver()
            .resolve(HorizonBucket::Long, RiskTier::Aggressive, vec![equity_delta(dec!(-15))])
            .unwrap();

        assert_eq!(result.base.equity, dec!(85));
        assert_eq!(result.adjusted.equity, dec!(70));
        assert_eq!(result.weights.total(), dec!(100));
        // 80 adjusted points scaled by 1.25
        assert_eq!(result.weights.equity, dec!(87.5));
        assert_eq!(result.weights.fixed_deposit, dec!(6.25));
        assert_eq!(result.weights.liquid, dec!(3.125));
        for (class, value) in result.weights.iter() {
            assert!(AllocationBounds::default().range(class).contains(value));
        }
        assert_eq!(result.instruments, vec!["Small Cap Fund".to_string()]);
    }

    #[test]
    fn test_scaling_pins_class_at_ceiling() {
        // equity would scale past its 95 ceiling
        let clamped = AssetWeights::new(dec!(1), dec!(1), dec!(0), dec!(93));
        let weights = renormalize(&clamped, &AllocationBounds::default()).unwrap();
        assert_eq!(weights.equity, dec!(95));
        assert_eq!(weights.total(), dec!(100));
        assert_eq!(weights.liquid, dec!(2.5));
        assert_eq!(weights.fixed_deposit, dec!(2.5));
    }

    #[test]
    fn test_lone_class_at_ceiling_spreads_by_headroom() {
        let clamped = AssetWeights::new(dec!(0), dec!(0), dec!(0), dec!(95));
        let weights = renormalize(&clamped, &AllocationBounds::default()).unwrap();
        assert_eq!(weights.equity, dec!(95));
        assert_eq!(weights.total(), dec!(100));
        assert!(weights.fixed_deposit > weights.gold);
    }

    #[test]
    fn test_headroom_spread_starts_at_floors() {
        let bounds = AllocationBounds {
            liquid: PercentRange::new(dec!(10), dec!(40)),
            fixed_deposit: PercentRange::new(dec!(0), dec!(60)),
            gold: PercentRange::new(dec!(0), dec!(20)),
            equity: PercentRange::new(dec!(0), dec!(30)),
        };
        // liquid pins at its floor, equity at its ceiling, and the 60 left
        // over is spread 60:20 across the two empty classes
        let raw = AssetWeights::new(dec!(0), dec!(0), dec!(0), dec!(50));
        let weights = renormalize(&raw, &bounds).unwrap();
        assert_eq!(weights.liquid, dec!(10));
        assert_eq!(weights.equity, dec!(30));
        assert_eq!(weights.fixed_deposit, dec!(45));
        assert_eq!(weights.gold, dec!(15));
        assert_eq!(weights.total(), dec!(100));
    }

    #[test]
    fn test_unplaceable_allocation_is_invariant_violation() {
        let fixed = PercentRange::new(dec!(10), dec!(10));
        let bounds = AllocationBounds {
            liquid: fixed,
            fixed_deposit: fixed,
            gold: fixed,
            equity: fixed,
        };
        let raw = AssetWeights::new(dec!(5), dec!(5), dec!(5), dec!(5));
        let err = renormalize(&raw, &bounds).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_rounding_residual_keeps_exact_total() {
        // gold pins at 20, the other three split 80 into thirds
        let clamped = AssetWeights::new(dec!(10), dec!(10), dec!(10), dec!(10));
        let weights = renormalize(&clamped, &AllocationBounds::default()).unwrap();
        assert_eq!(weights.total(), dec!(100));
        assert_eq!(weights.gold, dec!(20));
        assert_eq!(weights.liquid, dec!(26.6666));
        assert_eq!(weights.fixed_deposit, dec!(26.6667));
        assert_eq!(weights.equity, dec!(26.6667));
    }

    #[test]
    fn test_zero_sum_is_invariant_violation() {
        let err = renormalize(&AssetWeights::default(), &AllocationBounds::default()).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_large_deltas_are_clamped() {
        let result = resolver()
            .resolve(HorizonBucket::Long, RiskTier::Aggressive, vec![equity_delta(dec!(40))])
            .unwrap();
        assert_eq!(result.adjusted.equity, dec!(125));
        // clamped to 95, then scaled down with the rest (95 / 105 of 100)
        assert!(result.weights.equity > dec!(90) && result.weights.equity < dec!(95));
        assert_eq!(result.weights.total(), dec!(100));
    }

    #[test]
    fn test_missing_band() {
        let err = resolver()
            .resolve(HorizonBucket::Short, RiskTier::Moderate, vec![])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownReferenceData(_)));
    }

    #[test]
    fn test_savings_rate_delta() {
        let adjustment = SavingsRateAdjustment::default();
        let high = adjustment.delta_for(35.0).unwrap();
        assert_eq!(high.delta.equity, dec!(5));
        assert_eq!(high.delta.fixed_deposit, dec!(-5));
        let low = adjustment.delta_for(10.0).unwrap();
        assert_eq!(low.delta.equity, dec!(-5));
        assert!(adjustment.delta_for(30.0).is_none());
        assert!(adjustment.delta_for(15.0).is_none());
    }

    #[test]
    fn test_risk_tier_resolution() {
        use AgeBracket::*;
        assert_eq!(
            resolve_risk_tier(RiskTier::Moderate, RiskAppetite::Seeking, Age22To28),
            RiskTier::Aggressive
        );
        assert_eq!(
            resolve_risk_tier(RiskTier::Moderate, RiskAppetite::Averse, Age22To28),
            RiskTier::Conservative
        );
        assert_eq!(
            resolve_risk_tier(RiskTier::Aggressive, RiskAppetite::Neutral, Age40To60),
            RiskTier::Moderate
        );
        assert_eq!(
            resolve_risk_tier(RiskTier::Conservative, RiskAppetite::Seeking, Age60Plus),
            RiskTier::Moderate
        );
        assert_eq!(
            resolve_risk_tier(RiskTier::Conservative, RiskAppetite::Averse, Age60Plus),
            RiskTier::Conservative
        );
    }
}
