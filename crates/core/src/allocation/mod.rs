//! Allocation module - target asset allocation for a goal.

mod allocation_model;
mod allocation_resolver;

pub use allocation_model::{
    AllocationBand, AllocationBandTable, AllocationBounds, AllocationResult, AppliedDelta,
    AssetClass, AssetWeights, DeltaSource, HorizonBucket, PercentRange, RiskTier,
};
pub use allocation_resolver::{
    clamp_to_bounds, renormalize, resolve_risk_tier, AllocationResolver, SavingsRateAdjustment,
};
