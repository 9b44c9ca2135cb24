//! Property-based integration tests for the persona engine.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use std::collections::BTreeMap;

use finpersona_core::classification::{
    classify_behavior, resolve_dominant_category, BehaviorCategory, BehaviorThresholds,
    DominantCategory,
};
use finpersona_core::events::MockClassificationSink;
use finpersona_core::profile::{
    normalize_profile, AgeBracket, NormalizerSettings, SpendCategory, UserFinancialProfile,
};
use finpersona_core::{PersonaEngine, ReferenceData};
use proptest::prelude::*;
use rust_decimal_macros::dec;

// =============================================================================
// Generators
// =============================================================================

fn arb_region() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["maharashtra", "bihar", "Tamil Nadu", "mumbai", "delhi", "atlantis"])
        .prop_map(str::to_string)
}

fn arb_goal_id() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "FG001", "FG005", "FG006", "FG007", "FG011", "FG016", "FG020", "FG026", "FG032", "FG034",
    ])
    .prop_map(str::to_string)
}

fn arb_age() -> impl Strategy<Value = AgeBracket> {
    prop::sample::select(AgeBracket::ALL.to_vec())
}

/// needs/wants/savings summing to exactly 100.
fn arb_split() -> impl Strategy<Value = (f64, f64, f64)> {
    (0.0f64..=100.0, 0.0f64..=1.0).prop_map(|(needs, fraction)| {
        let wants = (100.0 - needs) * fraction;
        (needs, wants, 100.0 - needs - wants)
    })
}

fn arb_granular() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(prop_oneof![Just(0.0), 0.0f64..100.0], 5)
}

/// Generates a random valid profile.
fn arb_profile() -> impl Strategy<Value = UserFinancialProfile> {
    (
        100_000.0f64..10_000_000.0,
        arb_region(),
        arb_split(),
        arb_granular(),
        arb_goal_id(),
        0u32..40,
        arb_age(),
    )
        .prop_map(
            |(income, region, (needs, wants, savings), granular, goal_id, horizon, age)| {
                let mut profile = UserFinancialProfile::new(income, region)
                    .with_shares(needs, wants, savings)
                    .with_goal(goal_id, horizon)
                    .with_age(age);
                for (category, share) in SpendCategory::ALL.iter().zip(granular) {
                    profile = profile.with_granular(*category, share);
                }
                profile
            },
        )
}

fn engine() -> PersonaEngine {
    PersonaEngine::new(ReferenceData::default()).unwrap()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Accepted splits always normalize to 100.
    #[test]
    fn prop_normalized_ratios_sum_to_hundred(
        (needs, wants, savings) in arb_split(),
        drift in -4.9f64..4.9,
    ) {
        let profile = UserFinancialProfile::new(900_000.0, "delhi")
            .with_shares(needs + drift, wants, savings);
        prop_assume!(needs + drift >= 0.0);

        let normalized = normalize_profile(&profile, &NormalizerSettings::default()).unwrap();
        prop_assert!((normalized.ratio_sum() - 100.0).abs() < 1e-6);
        prop_assert!(normalized.needs >= 0.0);
        prop_assert!(normalized.wants >= 0.0);
        prop_assert!(normalized.savings >= 0.0);
    }

    /// Every classification returns an allocation summing to exactly 100.
    #[test]
    fn prop_allocation_sums_to_exactly_hundred(profile in arb_profile()) {
        let engine = engine();
        let result = engine.classify_selected(&profile).unwrap();

        prop_assert_eq!(result.allocation.weights.total(), dec!(100));
        for (class, value) in result.allocation.weights.iter() {
            prop_assert!(
                engine.reference().bounds.range(class).contains(value),
                "{} = {} out of bounds", class, value
            );
        }
    }

    /// Same input and reference data, same output.
    #[test]
    fn prop_classification_is_deterministic(profile in arb_profile()) {
        let first = engine().classify_selected(&profile).unwrap();
        let second = engine().classify_selected(&profile).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Once wants passes the spender threshold, no other share changes the label.
    #[test]
    fn prop_spender_is_monotonic_in_wants(
        wants in 30.0001f64..100.0,
        extra in 0.0f64..50.0,
        needs_fraction in 0.0f64..=1.0,
    ) {
        let thresholds = BehaviorThresholds::default();
        let rest = 100.0 - wants;
        let needs = rest * needs_fraction;
        let savings = rest - needs;

        prop_assert_eq!(
            classify_behavior(needs, wants, savings, &thresholds),
            BehaviorCategory::Spender
        );
        prop_assert_eq!(
            classify_behavior(needs, wants + extra, savings, &thresholds),
            BehaviorCategory::Spender
        );
    }

    /// Equal top shares always resolve to the higher-priority category,
    /// whatever order the map was filled in.
    #[test]
    fn prop_dominant_tie_break_is_stable(
        top in 1.0f64..100.0,
        picks in prop::sample::subsequence(SpendCategory::ALL.to_vec(), 2..=5),
        reversed in any::<bool>(),
    ) {
        let mut entries: Vec<(SpendCategory, f64)> = picks.iter().map(|c| (*c, top)).collect();
        if reversed {
            entries.reverse();
        }
        let shares: BTreeMap<SpendCategory, f64> = entries.into_iter().collect();

        let expected = DominantCategory::from(*picks.iter().min().unwrap());
        prop_assert_eq!(resolve_dominant_category(&shares), expected);
    }

    /// The sink receives exactly what the engine returned.
    #[test]
    fn prop_sink_receives_returned_result(profile in arb_profile()) {
        let engine = engine();
        let sink = MockClassificationSink::new();
        let result = engine
            .classify_and_record(&profile, &profile.goal_id, "prop-session", &sink)
            .unwrap();

        let records = sink.records();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(&records[0].persona_id, &result.persona_id);
        prop_assert_eq!(&records[0].goal_id, &result.goal_id);
        prop_assert_eq!(records[0].allocation, result.allocation.weights);
        prop_assert_eq!(records[0].fallback, result.is_fallback());
    }
}
