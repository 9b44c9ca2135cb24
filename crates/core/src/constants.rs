/// Target total for needs/wants/savings and for an allocation
pub const PERCENT_TOTAL: f64 = 100.0;

/// Tolerance for the normalized needs + wants + savings sum
pub const RATIO_SUM_EPSILON: f64 = 1e-6;

/// Decimal places kept on allocation percentages
pub const ALLOCATION_DECIMAL_PRECISION: u32 = 4;

/// Number of dimensions in a persona feature vector
pub const FEATURE_DIMENSIONS: usize = 9;

/// Region multiplier used when a region is not in the cost index
pub const DEFAULT_REGION_MULTIPLIER: f64 = 1.0;
