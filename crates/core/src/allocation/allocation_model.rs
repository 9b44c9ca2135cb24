//! Allocation models: asset classes, bands, bounds and results.

use std::ops::Add;

use num_traits::Zero;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ReferenceError, Result};

/// Asset classes a target allocation is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Liquid,
    FixedDeposit,
    Gold,
    Equity,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Liquid,
        AssetClass::FixedDeposit,
        AssetClass::Gold,
        AssetClass::Equity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Liquid => "LIQUID",
            AssetClass::FixedDeposit => "FIXED_DEPOSIT",
            AssetClass::Gold => "GOLD",
            AssetClass::Equity => "EQUITY",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One percentage-point value per asset class.
///
/// Used for allocations as well as for signed additive deltas. Missing
/// fields deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetWeights {
    pub liquid: Decimal,
    pub fixed_deposit: Decimal,
    pub gold: Decimal,
    pub equity: Decimal,
}

impl AssetWeights {
    pub fn new(liquid: Decimal, fixed_deposit: Decimal, gold: Decimal, equity: Decimal) -> Self {
        Self {
            liquid,
            fixed_deposit,
            gold,
            equity,
        }
    }

    pub fn get(&self, class: AssetClass) -> Decimal {
        match class {
            AssetClass::Liquid => self.liquid,
            AssetClass::FixedDeposit => self.fixed_deposit,
            AssetClass::Gold => self.gold,
            AssetClass::Equity => self.equity,
        }
    }

    pub fn set(&mut self, class: AssetClass, value: Decimal) {
        match class {
            AssetClass::Liquid => self.liquid = value,
            AssetClass::FixedDeposit => self.fixed_deposit = value,
            AssetClass::Gold => self.gold = value,
            AssetClass::Equity => self.equity = value,
        }
    }

    pub fn total(&self) -> Decimal {
        self.liquid + self.fixed_deposit + self.gold + self.equity
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, Decimal)> + '_ {
        AssetClass::ALL.into_iter().map(move |class| (class, self.get(class)))
    }

    /// The class holding the largest weight; ties go to the earlier class
    /// in [`AssetClass::ALL`].
    pub fn largest_class(&self) -> AssetClass {
        let mut best = AssetClass::ALL[0];
        for class in AssetClass::ALL {
            if self.get(class) > self.get(best) {
                best = class;
            }
        }
        best
    }
}

/// Component-wise sum.
impl Add for AssetWeights {
    type Output = AssetWeights;

    fn add(self, other: AssetWeights) -> AssetWeights {
        AssetWeights {
            liquid: self.liquid + other.liquid,
            fixed_deposit: self.fixed_deposit + other.fixed_deposit,
            gold: self.gold + other.gold,
            equity: self.equity + other.equity,
        }
    }
}

impl Zero for AssetWeights {
    fn zero() -> Self {
        AssetWeights::default()
    }

    fn is_zero(&self) -> bool {
        AssetClass::ALL.iter().all(|class| self.get(*class).is_zero())
    }
}

/// Closed percentage range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PercentRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> Decimal {
        (self.min + self.max) / dec!(2)
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: Decimal) -> Decimal {
        value.max(self.min).min(self.max)
    }
}

/// Coarse grouping of the investment horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizonBucket {
    Short,
    Medium,
    Long,
}

impl HorizonBucket {
    pub const ALL: [HorizonBucket; 3] = [
        HorizonBucket::Short,
        HorizonBucket::Medium,
        HorizonBucket::Long,
    ];

    /// SHORT below 5 years, MEDIUM from 5 to 15 years, LONG above 15.
    pub fn from_years(years: u32) -> Self {
        if years < 5 {
            HorizonBucket::Short
        } else if years <= 15 {
            HorizonBucket::Medium
        } else {
            HorizonBucket::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HorizonBucket::Short => "SHORT",
            HorizonBucket::Medium => "MEDIUM",
            HorizonBucket::Long => "LONG",
        }
    }
}

impl std::fmt::Display for HorizonBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse risk-tolerance grouping, ordered from least to most risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [
        RiskTier::Conservative,
        RiskTier::Moderate,
        RiskTier::Aggressive,
    ];

    pub fn step_down(self) -> Self {
        match self {
            RiskTier::Aggressive => RiskTier::Moderate,
            _ => RiskTier::Conservative,
        }
    }

    pub fn step_up(self) -> Self {
        match self {
            RiskTier::Conservative => RiskTier::Moderate,
            _ => RiskTier::Aggressive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Conservative => "CONSERVATIVE",
            RiskTier::Moderate => "MODERATE",
            RiskTier::Aggressive => "AGGRESSIVE",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target ranges for one (horizon, risk) cell of the allocation matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBand {
    pub horizon: HorizonBucket,
    pub risk: RiskTier,
    pub liquid: PercentRange,
    pub fixed_deposit: PercentRange,
    pub gold: PercentRange,
    pub equity: PercentRange,
    /// Informational, e.g. "11-12%"
    pub expected_return: String,
    /// Informational, e.g. "quarterly"
    pub rebalance_frequency: String,
    /// Instrument hints for presentation
    #[serde(default)]
    pub instruments: Vec<String>,
}

impl AllocationBand {
    pub fn range(&self, class: AssetClass) -> &PercentRange {
        match class {
            AssetClass::Liquid => &self.liquid,
            AssetClass::FixedDeposit => &self.fixed_deposit,
            AssetClass::Gold => &self.gold,
            AssetClass::Equity => &self.equity,
        }
    }

    /// Midpoint of every range; the base allocation before deltas.
    pub fn midpoints(&self) -> AssetWeights {
        AssetWeights {
            liquid: self.liquid.midpoint(),
            fixed_deposit: self.fixed_deposit.midpoint(),
            gold: self.gold.midpoint(),
            equity: self.equity.midpoint(),
        }
    }
}

/// The (horizon, risk) allocation matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationBandTable(Vec<AllocationBand>);

impl AllocationBandTable {
    pub fn new(bands: Vec<AllocationBand>) -> Self {
        Self(bands)
    }

    pub fn get(&self, horizon: HorizonBucket, risk: RiskTier) -> Result<&AllocationBand> {
        self.0
            .iter()
            .find(|band| band.horizon == horizon && band.risk == risk)
            .ok_or_else(|| {
                ReferenceError::MissingBand {
                    horizon: horizon.to_string(),
                    risk: risk.to_string(),
                }
                .into()
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &AllocationBand> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Requires exactly one band per (horizon, risk) pair with ordered
    /// ranges inside [0, 100].
    pub fn validate(&self) -> Result<()> {
        for horizon in HorizonBucket::ALL {
            for risk in RiskTier::ALL {
                let count = self
                    .0
                    .iter()
                    .filter(|band| band.horizon == horizon && band.risk == risk)
                    .count();
                if count != 1 {
                    return Err(Error::InvalidConfigValue(format!(
                        "expected one allocation band for {}/{}, found {}",
                        horizon, risk, count
                    )));
                }
            }
        }

        for band in &self.0 {
            for class in AssetClass::ALL {
                let range = band.range(class);
                if range.min > range.max || range.min < Decimal::ZERO || range.max > dec!(100) {
                    return Err(Error::InvalidConfigValue(format!(
                        "band {}/{} has an invalid {} range [{}, {}]",
                        band.horizon, band.risk, class, range.min, range.max
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Global floor/ceiling applied to every resolved allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBounds {
    pub liquid: PercentRange,
    pub fixed_deposit: PercentRange,
    pub gold: PercentRange,
    pub equity: PercentRange,
}

impl AllocationBounds {
    pub fn range(&self, class: AssetClass) -> &PercentRange {
        match class {
            AssetClass::Liquid => &self.liquid,
            AssetClass::FixedDeposit => &self.fixed_deposit,
            AssetClass::Gold => &self.gold,
            AssetClass::Equity => &self.equity,
        }
    }

    pub fn floor_total(&self) -> Decimal {
        AssetClass::ALL.iter().map(|class| self.range(*class).min).sum()
    }

    pub fn ceiling_total(&self) -> Decimal {
        AssetClass::ALL.iter().map(|class| self.range(*class).max).sum()
    }

    /// Floors must sum to at most 100 and ceilings to at least 100.
    pub fn validate(&self) -> Result<()> {
        for class in AssetClass::ALL {
            let range = self.range(class);
            if range.min > range.max || range.min < Decimal::ZERO {
                return Err(Error::InvalidConfigValue(format!(
                    "invalid {} bound [{}, {}]",
                    class, range.min, range.max
                )));
            }
        }
        if self.floor_total() > dec!(100) || self.ceiling_total() < dec!(100) {
            return Err(Error::InvalidConfigValue(format!(
                "allocation bounds are infeasible: floors sum to {}, ceilings to {}",
                self.floor_total(),
                self.ceiling_total()
            )));
        }
        Ok(())
    }
}

impl Default for AllocationBounds {
    fn default() -> Self {
        Self {
            liquid: PercentRange::new(dec!(0), dec!(40)),
            fixed_deposit: PercentRange::new(dec!(0), dec!(60)),
            gold: PercentRange::new(dec!(0), dec!(20)),
            equity: PercentRange::new(dec!(0), dec!(95)),
        }
    }
}

/// Where an additive delta came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeltaSource {
    Persona,
    Goal,
    SavingsRate,
}

/// A delta that was applied on top of the band midpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDelta {
    pub source: DeltaSource,
    /// Persona id, goal id or savings-rate rule name
    pub reference: String,
    pub delta: AssetWeights,
}

/// Resolved target allocation.
///
/// `weights` sums to exactly 100. The intermediate stages are retained for
/// explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub horizon: HorizonBucket,
    pub risk_tier: RiskTier,
    pub weights: AssetWeights,
    /// Band midpoints
    pub base: AssetWeights,
    /// Base plus all deltas, before clamping
    pub adjusted: AssetWeights,
    pub applied_deltas: Vec<AppliedDelta>,
    pub expected_return: String,
    pub rebalance_frequency: String,
    pub instruments: Vec<String>,
}
