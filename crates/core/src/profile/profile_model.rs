//! User financial profile models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A "wants" spending sub-category.
///
/// Declaration order is the tie-break priority used by the granular
/// preference resolver and the dimension order of the feature vector:
/// shopping > dining > travel > entertainment > other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendCategory {
    Shopping,
    Dining,
    Travel,
    Entertainment,
    Other,
}

impl SpendCategory {
    /// All categories in priority order.
    pub const ALL: [SpendCategory; 5] = [
        SpendCategory::Shopping,
        SpendCategory::Dining,
        SpendCategory::Travel,
        SpendCategory::Entertainment,
        SpendCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpendCategory::Shopping => "shopping",
            SpendCategory::Dining => "dining",
            SpendCategory::Travel => "travel",
            SpendCategory::Entertainment => "entertainment",
            SpendCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for SpendCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse age bracket collected alongside the spending profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "18-22")]
    Age18To22,
    #[serde(rename = "22-28")]
    Age22To28,
    #[serde(rename = "29-39")]
    Age29To39,
    #[serde(rename = "40-60")]
    Age40To60,
    #[serde(rename = "60+")]
    Age60Plus,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 5] = [
        AgeBracket::Age18To22,
        AgeBracket::Age22To28,
        AgeBracket::Age29To39,
        AgeBracket::Age40To60,
        AgeBracket::Age60Plus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::Age18To22 => "18-22",
            AgeBracket::Age22To28 => "22-28",
            AgeBracket::Age29To39 => "29-39",
            AgeBracket::Age40To60 => "40-60",
            AgeBracket::Age60Plus => "60+",
        }
    }

    /// Brackets whose risk tier is capped at moderate.
    pub fn is_late_career(&self) -> bool {
        matches!(self, AgeBracket::Age40To60 | AgeBracket::Age60Plus)
    }
}

impl std::fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw classification input as collected from the user.
///
/// Shares are percentages. `granular_wants` holds each sub-category's share
/// of the "wants" bucket; categories left out count as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFinancialProfile {
    /// Annual income, in the same unit as the tier breakpoints
    pub income: f64,
    /// Region identifier looked up in the cost-of-living index
    pub region: String,
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
    #[serde(default)]
    pub granular_wants: BTreeMap<SpendCategory, f64>,
    /// Goal selected by the user
    pub goal_id: String,
    pub horizon_years: u32,
    pub age_bracket: AgeBracket,
}

impl UserFinancialProfile {
    /// Creates a profile with an even 50/30/20 split and no granular data.
    pub fn new(income: f64, region: impl Into<String>) -> Self {
        Self {
            income,
            region: region.into(),
            needs: 50.0,
            wants: 30.0,
            savings: 20.0,
            granular_wants: BTreeMap::new(),
            goal_id: String::new(),
            horizon_years: 10,
            age_bracket: AgeBracket::Age29To39,
        }
    }

    pub fn with_shares(mut self, needs: f64, wants: f64, savings: f64) -> Self {
        self.needs = needs;
        self.wants = wants;
        self.savings = savings;
        self
    }

    pub fn with_granular(mut self, category: SpendCategory, share: f64) -> Self {
        self.granular_wants.insert(category, share);
        self
    }

    pub fn with_goal(mut self, goal_id: impl Into<String>, horizon_years: u32) -> Self {
        self.goal_id = goal_id.into();
        self.horizon_years = horizon_years;
        self
    }

    pub fn with_age(mut self, age_bracket: AgeBracket) -> Self {
        self.age_bracket = age_bracket;
        self
    }
}

/// A validated profile whose ratios have been rescaled.
///
/// `needs + wants + savings` is 100 and every sub-category is present in
/// `granular_wants`, summing to 100 (or all zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProfile {
    pub income: f64,
    pub region: String,
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
    pub granular_wants: BTreeMap<SpendCategory, f64>,
    pub goal_id: String,
    pub horizon_years: u32,
    pub age_bracket: AgeBracket,
    /// needs + wants + savings as submitted
    pub submitted_ratio_sum: f64,
}

impl NormalizedProfile {
    pub fn granular_share(&self, category: SpendCategory) -> f64 {
        self.granular_wants.get(&category).copied().unwrap_or(0.0)
    }

    pub fn ratio_sum(&self) -> f64 {
        self.needs + self.wants + self.savings
    }

    pub fn granular_sum(&self) -> f64 {
        self.granular_wants.values().sum()
    }
}
