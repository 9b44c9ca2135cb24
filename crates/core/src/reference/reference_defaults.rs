//! Built-in reference tables.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::allocation::{
    AllocationBand, AllocationBandTable, AssetWeights, HorizonBucket, PercentRange, RiskTier,
};
use crate::classification::{
    AffordabilityTier, BehaviorCategory, DominantCategory, RegionalCostIndex,
};
use crate::goals::{GoalCatalog, GoalCategory, GoalDefinition, GoalPriority};
use crate::personas::{
    Comparison, DecisionRule, DecisionTable, PersonaDefinition, PersonaSet, RiskAppetite,
    RulePredicate, ShareMetric,
};
use crate::profile::{AgeBracket, SpendCategory};

// =============================================================================
// Regions
// =============================================================================

/// Cost-of-living multipliers for Indian states, union territories and
/// Mumbai.
pub fn default_region_index() -> RegionalCostIndex {
    RegionalCostIndex::new([
        ("andhra-pradesh", 1.05),
        ("arunachal-pradesh", 0.95),
        ("assam", 0.95),
        ("bihar", 0.75),
        ("chhattisgarh", 0.8),
        ("goa", 1.3),
        ("gujarat", 1.05),
        ("haryana", 1.15),
        ("himachal-pradesh", 1.0),
        ("jharkhand", 0.85),
        ("karnataka", 1.35),
        ("kerala", 1.05),
        ("madhya-pradesh", 0.85),
        ("maharashtra", 1.4),
        ("manipur", 0.9),
        ("meghalaya", 0.95),
        ("mizoram", 0.9),
        ("nagaland", 0.9),
        ("odisha", 0.8),
        ("punjab", 1.05),
        ("rajasthan", 0.95),
        ("sikkim", 1.1),
        ("tamil-nadu", 1.05),
        ("telangana", 1.2),
        ("tripura", 0.85),
        ("uttar-pradesh", 0.85),
        ("uttarakhand", 1.0),
        ("west-bengal", 1.0),
        ("andaman-and-nicobar-islands", 1.25),
        ("chandigarh", 1.25),
        ("dadra-and-nagar-haveli-and-daman-and-diu", 0.95),
        ("delhi", 1.35),
        ("jammu-and-kashmir", 1.1),
        ("ladakh", 1.2),
        ("lakshadweep", 1.15),
        ("puducherry", 1.05),
        ("mumbai", 1.5),
    ])
}

// =============================================================================
// Personas
// =============================================================================

fn delta(liquid: i64, fixed_deposit: i64, gold: i64, equity: i64) -> AssetWeights {
    AssetWeights::new(
        Decimal::from(liquid),
        Decimal::from(fixed_deposit),
        Decimal::from(gold),
        Decimal::from(equity),
    )
}

fn persona(
    id: &str,
    name: &str,
    role: &str,
    traits: &[&str],
    risk_appetite: RiskAppetite,
    allocation_delta: AssetWeights,
    centroid: [f64; 8],
) -> PersonaDefinition {
    // centroids carry no weight on the "other" sub-category
    let mut reference_vector = centroid.to_vec();
    reference_vector.push(0.0);
    PersonaDefinition {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        traits: traits.iter().map(|t| t.to_string()).collect(),
        risk_appetite,
        allocation_delta,
        reference_vector,
    }
}

/// The sixteen reference personas.
pub fn default_personas() -> PersonaSet {
    use RiskAppetite::*;
    let none = AssetWeights::default();

    PersonaSet::new(vec![
        persona(
            "poo",
            "Shopping Queen",
            "The Brand Loyalist",
            &["High Spender", "Fashion First", "Impulse"],
            Neutral,
            delta(0, 5, 0, -5),
            [90.0, 20.0, 70.0, 10.0, 80.0, 20.0, 0.0, 0.0],
        ),
        persona(
            "bunny",
            "Traveler",
            "The Wanderer",
            &["Experiences", "Travel Lover", "Spontaneous"],
            Neutral,
            none,
            [80.0, 20.0, 60.0, 20.0, 10.0, 20.0, 70.0, 0.0],
        ),
        persona(
            "raj",
            "Balanced Rich Spender",
            "The Comfortable Heir",
            &["Cash Rich", "Entertainment", "Generous"],
            Neutral,
            none,
            [90.0, 30.0, 50.0, 20.0, 20.0, 30.0, 20.0, 30.0],
        ),
        persona(
            "chatur",
            "Status Flexer",
            "The Corporate Climber",
            &["Status", "Competitive", "Leverage"],
            Seeking,
            none,
            [85.0, 20.0, 60.0, 20.0, 50.0, 30.0, 10.0, 10.0],
        ),
        persona(
            "rancho",
            "Minimalist Genius",
            "The Frugal Innovator",
            &["Minimalist", "High Saver", "Curious"],
            Neutral,
            delta(-5, 0, 0, 5),
            [90.0, 10.0, 10.0, 80.0, 0.0, 0.0, 50.0, 50.0],
        ),
        persona(
            "farhan",
            "Passion Chaser",
            "The Career Switcher",
            &["Purpose Driven", "Balanced", "Travel"],
            Neutral,
            none,
            [70.0, 40.0, 30.0, 30.0, 10.0, 10.0, 40.0, 40.0],
        ),
        persona(
            "geet",
            "Impulsive Spender",
            "The Free Spirit",
            &["Impulse", "Travel", "Optimist"],
            Neutral,
            none,
            [65.0, 30.0, 60.0, 10.0, 20.0, 10.0, 60.0, 10.0],
        ),
        persona(
            "simran",
            "Disciplined Saver",
            "The Dutiful Planner",
            &["Saver", "Family First", "Cautious"],
            Averse,
            delta(0, 5, 5, -10),
            [60.0, 30.0, 20.0, 50.0, 20.0, 20.0, 20.0, 40.0],
        ),
        persona(
            "rani",
            "Saver for Travel",
            "The Solo Explorer",
            &["Goal Saver", "Travel", "Independent"],
            Neutral,
            none,
            [65.0, 30.0, 20.0, 50.0, 0.0, 0.0, 80.0, 20.0],
        ),
        persona(
            "munna",
            "Social Spender",
            "The Crowd Favourite",
            &["Foodie", "Social", "Generous"],
            Neutral,
            none,
            [50.0, 40.0, 50.0, 10.0, 10.0, 70.0, 0.0, 20.0],
        ),
        persona(
            "shyam",
            "Steady Job",
            "The Salaried Realist",
            &["Stable Income", "Risk Averse", "Routine"],
            Averse,
            none,
            [45.0, 50.0, 20.0, 30.0, 0.0, 0.0, 0.0, 0.0],
        ),
        persona(
            "veeru",
            "Risk Gambler",
            "The Thrill Seeker",
            &["Speculative", "Entertainment", "FOMO"],
            Seeking,
            delta(-5, 0, -5, 10),
            [40.0, 40.0, 50.0, 10.0, 0.0, 10.0, 0.0, 90.0],
        ),
        persona(
            "raju",
            "Scheme Chaser",
            "The Shortcut Hunter",
            &["Get Rich Quick", "Gullible", "Low Savings"],
            Seeking,
            none,
            [20.0, 50.0, 45.0, 5.0, 20.0, 20.0, 20.0, 40.0],
        ),
        persona(
            "baburao",
            "Poor Saver",
            "The Old-School Hoarder",
            &["Frugal", "Cash Hoarder", "Traditional"],
            Averse,
            delta(0, 10, 0, -10),
            [15.0, 40.0, 10.0, 50.0, 0.0, 0.0, 0.0, 0.0],
        ),
        persona(
            "pushpa",
            "Survivor",
            "The Hustler",
            &["Cash Flow Focus", "Survival", "Resilient"],
            Averse,
            delta(0, 15, 0, -15),
            [25.0, 80.0, 10.0, 10.0, 0.0, 0.0, 0.0, 0.0],
        ),
        persona(
            "circuit",
            "Loyal Follower",
            "The Sidekick",
            &["Loyal", "Social", "Follows the Crowd"],
            Neutral,
            none,
            [20.0, 60.0, 30.0, 10.0, 0.0, 60.0, 0.0, 40.0],
        ),
    ])
}

// =============================================================================
// Decision table
// =============================================================================

fn spender() -> RulePredicate {
    RulePredicate::behavior(BehaviorCategory::Spender)
}

fn saver() -> RulePredicate {
    RulePredicate::behavior(BehaviorCategory::Saver)
}

fn survivor() -> RulePredicate {
    RulePredicate::behavior(BehaviorCategory::Survivor)
}

fn granular(category: SpendCategory) -> ShareMetric {
    ShareMetric::Granular(category)
}

/// The tiered first-match-wins rule table. Every tier ends with an
/// always-true default.
pub fn default_decision_table() -> DecisionTable {
    use AffordabilityTier::*;
    use DominantCategory as D;
    use SpendCategory as S;

    let mut rules = BTreeMap::new();

    rules.insert(
        High,
        vec![
            DecisionRule::persona(
                "high-spender-shopping",
                spender().with_dominant(D::Shopping),
                "poo",
            ),
            DecisionRule::persona(
                "high-spender-travel",
                spender().with_dominant(D::Travel),
                "bunny",
            ),
            DecisionRule::persona(
                "high-spender-entertainment",
                spender().with_dominant(D::Entertainment),
                "raj",
            ),
            DecisionRule::persona("high-spender", spender(), "chatur"),
            DecisionRule::persona(
                "high-saver-heavy",
                saver().with_condition(ShareMetric::Savings, Comparison::Gt, 50.0),
                "rancho",
            ),
            DecisionRule::persona("high-saver", saver(), "farhan"),
            DecisionRule::persona("high-default", RulePredicate::always(), "raj"),
        ],
    );

    rules.insert(
        MidHigh,
        vec![
            DecisionRule::persona(
                "mid-high-spender-shopping-heavy",
                spender()
                    .with_dominant(D::Shopping)
                    .with_condition(granular(S::Shopping), Comparison::Gt, 35.0),
                "poo",
            ),
            DecisionRule::persona(
                "mid-high-spender-shopping",
                spender().with_dominant(D::Shopping),
                "chatur",
            ),
            DecisionRule::persona(
                "mid-high-spender-travel",
                spender().with_dominant(D::Travel),
                "geet",
            ),
            DecisionRule::persona(
                "mid-high-spender-dining",
                spender().with_dominant(D::Dining),
                "munna",
            ),
            DecisionRule::persona("mid-high-spender", spender(), "geet"),
            DecisionRule::persona(
                "mid-high-saver-travel",
                saver().with_condition(granular(S::Travel), Comparison::Gt, 15.0),
                "rani",
            ),
            DecisionRule::persona("mid-high-saver", saver(), "simran"),
            DecisionRule::persona("mid-high-survivor", survivor(), "shyam"),
            DecisionRule::persona("mid-high-default", RulePredicate::always(), "farhan"),
        ],
    );

    rules.insert(
        MidLow,
        vec![
            DecisionRule::persona(
                "mid-low-spender-dining",
                spender().with_dominant(D::Dining),
                "munna",
            ),
            DecisionRule::persona(
                "mid-low-spender-dining-share",
                spender().with_condition(granular(S::Dining), Comparison::Gt, 20.0),
                "munna",
            ),
            DecisionRule::persona(
                "mid-low-spender-entertainment",
                spender().with_dominant(D::Entertainment),
                "veeru",
            ),
            DecisionRule::persona(
                "mid-low-spender-entertainment-share",
                spender().with_condition(granular(S::Entertainment), Comparison::Gt, 20.0),
                "veeru",
            ),
            DecisionRule::persona(
                "mid-low-spender-travel",
                spender().with_dominant(D::Travel),
                "bunny",
            ),
            DecisionRule::persona("mid-low-spender", spender(), "raju"),
            DecisionRule::persona(
                "mid-low-saver-heavy",
                saver().with_condition(ShareMetric::Savings, Comparison::Gt, 40.0),
                "simran",
            ),
            DecisionRule::persona("mid-low-saver", saver(), "shyam"),
            DecisionRule::persona(
                "mid-low-survivor-dining",
                survivor().with_condition(granular(S::Dining), Comparison::Gt, 5.0),
                "circuit",
            ),
            DecisionRule::persona("mid-low-survivor", survivor(), "pushpa"),
            DecisionRule::persona("mid-low-default", RulePredicate::always(), "shyam"),
        ],
    );

    rules.insert(
        Low,
        vec![
            DecisionRule::persona("low-spender", spender(), "raju"),
            DecisionRule::persona("low-saver", saver(), "baburao"),
            DecisionRule::persona(
                "low-survivor-strained",
                survivor().with_condition(ShareMetric::Needs, Comparison::Gt, 65.0),
                "pushpa",
            ),
            DecisionRule::persona("low-survivor", survivor(), "circuit"),
            DecisionRule::persona("low-default", RulePredicate::always(), "baburao"),
        ],
    );

    DecisionTable::new(rules)
}

// =============================================================================
// Allocation bands
// =============================================================================

fn range(min: i64, max: i64) -> PercentRange {
    PercentRange::new(Decimal::from(min), Decimal::from(max))
}

#[allow(clippy::too_many_arguments)]
fn band(
    horizon: HorizonBucket,
    risk: RiskTier,
    liquid: PercentRange,
    fixed_deposit: PercentRange,
    gold: PercentRange,
    equity: PercentRange,
    expected_return: &str,
    rebalance_frequency: &str,
    instruments: &[&str],
) -> AllocationBand {
    AllocationBand {
        horizon,
        risk,
        liquid,
        fixed_deposit,
        gold,
        equity,
        expected_return: expected_return.to_string(),
        rebalance_frequency: rebalance_frequency.to_string(),
        instruments: instruments.iter().map(|i| i.to_string()).collect(),
    }
}

/// The nine (horizon, risk) allocation bands.
pub fn default_allocation_bands() -> AllocationBandTable {
    use HorizonBucket::*;
    use RiskTier::*;

    AllocationBandTable::new(vec![
        band(
            Short,
            Conservative,
            range(35, 40),
            range(45, 55),
            range(5, 10),
            range(0, 5),
            "5.5-7%",
            "semi-annual",
            &["Liquid Funds", "Overnight Funds", "Bank FDs"],
        ),
        band(
            Short,
            Moderate,
            range(20, 30),
            range(40, 50),
            range(10, 15),
            range(10, 15),
            "7-8.5%",
            "quarterly",
            &["Arbitrage Funds", "Short Duration Debt", "Hybrid Conservative"],
        ),
        band(
            Short,
            Aggressive,
            range(10, 20),
            range(10, 20),
            range(5, 10),
            range(55, 70),
            "10-12%",
            "monthly",
            &["Balanced Advantage", "Flexi Cap", "Large Cap"],
        ),
        band(
            Medium,
            Conservative,
            range(10, 20),
            range(30, 40),
            range(10, 15),
            range(30, 40),
            "8-9.5%",
            "quarterly",
            &["Hybrid Conservative", "Corporate Bond Funds"],
        ),
        band(
            Medium,
            Moderate,
            range(5, 10),
            range(15, 25),
            range(5, 10),
            range(55, 70),
            "10-11%",
            "quarterly",
            &["Nifty 50 Index", "Aggressive Hybrid", "Sovereign Gold Bonds"],
        ),
        band(
            Medium,
            Aggressive,
            range(0, 5),
            range(10, 15),
            range(5, 10),
            range(65, 85),
            "12-14%",
            "monthly",
            &["Mid Cap Funds", "Active Small Cap", "Momentum Strategy"],
        ),
        band(
            Long,
            Conservative,
            range(5, 10),
            range(30, 40),
            range(10, 15),
            range(40, 50),
            "9-10%",
            "semi-annual",
            &["Balanced Advantage", "Large Cap Index"],
        ),
        band(
            Long,
            Moderate,
            range(5, 5),
            range(10, 20),
            range(5, 10),
            range(65, 85),
            "11-12%",
            "quarterly",
            &["Flexi Cap", "Nifty Next 50", "PPF/NPS"],
        ),
        band(
            Long,
            Aggressive,
            range(0, 5),
            range(0, 10),
            range(0, 5),
            range(75, 95),
            "13-15%",
            "quarterly",
            &["Small Cap Funds", "Mid Cap Funds", "Sectoral Bets"],
        ),
    ])
}

// =============================================================================
// Goals
// =============================================================================

/// Declared tolerance before persona and age adjustments.
///
/// Critical and essential goals protect capital: conservative when the
/// horizon label mentions a short term, moderate otherwise. Everything else
/// is aggressive.
fn declared_risk(category: GoalCategory, priority: GoalPriority, horizon_label: &str) -> RiskTier {
    if priority == GoalPriority::Critical || category == GoalCategory::Essential {
        if horizon_label.contains("Short") {
            RiskTier::Conservative
        } else {
            RiskTier::Moderate
        }
    } else {
        RiskTier::Aggressive
    }
}

fn goal_delta(id: &str) -> AssetWeights {
    match id {
        // capital needed on a fixed date
        "FG001" | "FG007" | "FG011" | "FG014" | "FG015" | "FG030" => AssetWeights {
            fixed_deposit: dec!(10),
            equity: dec!(-10),
            ..Default::default()
        },
        // long compounding
        "FG006" | "FG016" => AssetWeights {
            equity: dec!(10),
            fixed_deposit: dec!(-5),
            gold: dec!(-5),
            ..Default::default()
        },
        _ => AssetWeights::default(),
    }
}

fn goal(
    id: &str,
    label: &str,
    category: GoalCategory,
    horizon_label: &str,
    priority: GoalPriority,
) -> GoalDefinition {
    GoalDefinition {
        id: id.to_string(),
        label: label.to_string(),
        category,
        priority,
        horizon_label: horizon_label.to_string(),
        risk_tolerance: declared_risk(category, priority, horizon_label),
        allocation_delta: goal_delta(id),
    }
}

/// The goal table and per-age-bracket suggestions.
pub fn default_goal_catalog() -> GoalCatalog {
    use GoalCategory::*;
    use GoalPriority::*;

    let goals = vec![
        goal("FG001", "Emergency Fund", Essential, "Short", Critical),
        goal("FG002", "Health Insurance", Essential, "Short", Critical),
        goal("FG003", "Term Life Insurance", Essential, "Long", Critical),
        goal("FG004", "Student Loan Repayment", Essential, "Medium", High),
        goal("FG005", "First Home Purchase", Wealth, "Medium", High),
        goal("FG006", "FIRE (Retire Early)", Lifestyle, "Long", High),
        goal("FG007", "Destination Wedding", Lifestyle, "Short-Medium", Medium),
        goal("FG008", "Second Home (Hills)", Lifestyle, "Medium-Long", Medium),
        goal("FG009", "Global Education (Kids)", Lifestyle, "Long", High),
        goal("FG010", "Angel Investing", Wealth, "Long", Medium),
        goal("FG011", "Parental Medical Care", Essential, "Medium-Long", Critical),
        goal("FG012", "Home Renovation", Lifestyle, "Short-Medium", Medium),
        goal("FG013", "Sabbatical (Break)", Lifestyle, "Short", Medium),
        goal("FG014", "Luxury Car", Lifestyle, "Short-Medium", Low),
        goal("FG015", "Intl Family Vacation", Lifestyle, "Short", Medium),
        goal("FG016", "SIP Portfolio", Wealth, "Long", Critical),
        goal("FG017", "Stock Market (Direct)", Wealth, "Long", High),
        goal("FG018", "REIT Portfolio", Wealth, "Medium-Long", Medium),
        goal("FG019", "P2P Lending", Wealth, "Short-Medium", Medium),
        goal("FG020", "FD Ladder", Wealth, "Short-Long", Medium),
        goal("FG021", "Tax Saving (PPF/NPS)", Wealth, "Long", Critical),
        goal("FG022", "Startup Funding (Own)", Wealth, "Medium-Long", Low),
        goal("FG023", "Digital Business Setup", Wealth, "Short-Medium", Medium),
        goal("FG026", "Dividend Portfolio", Wealth, "Long", High),
        goal("FG027", "Freelance Side Hustle", Wealth, "Short-Medium", Medium),
        goal("FG029", "Child Education (India)", Essential, "Medium-Long", High),
        goal("FG030", "Wedding Fund", Lifestyle, "Short-Medium", Medium),
        goal("FG032", "Skill Upgrade (MBA/CFA)", Wealth, "Short", High),
        goal("FG033", "Legacy Planning", Essential, "Long", Medium),
        goal("FG034", "Charity Fund", Lifestyle, "Long", Medium),
    ];

    let ids = |list: &[&str]| list.iter().map(|id| id.to_string()).collect::<Vec<_>>();
    let mut suggestions = BTreeMap::new();
    suggestions.insert(
        AgeBracket::Age18To22,
        ids(&["FG001", "FG002", "FG013", "FG015", "FG032", "FG006"]),
    );
    suggestions.insert(
        AgeBracket::Age22To28,
        ids(&["FG001", "FG006", "FG016", "FG005", "FG015", "FG030"]),
    );
    suggestions.insert(
        AgeBracket::Age29To39,
        ids(&["FG005", "FG029", "FG011", "FG010", "FG006", "FG027"]),
    );
    suggestions.insert(
        AgeBracket::Age40To60,
        ids(&["FG016", "FG011", "FG033", "FG026", "FG034", "FG008"]),
    );
    suggestions.insert(
        AgeBracket::Age60Plus,
        ids(&["FG011", "FG020", "FG033", "FG034", "FG026"]),
    );

    GoalCatalog::new(goals, suggestions)
}
