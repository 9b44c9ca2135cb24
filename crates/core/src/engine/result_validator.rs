//! Post-computation consistency checks.
//!
//! The validator never corrects a result. Any failure is a defect in the
//! reference tables or the pipeline and is logged with the full state.

use log::error;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::{PERCENT_TOTAL, RATIO_SUM_EPSILON};
use crate::errors::{Error, Result};
use crate::reference::ReferenceData;

use super::engine_model::ClassificationResult;

fn violation(result: &ClassificationResult, message: String) -> Error {
    error!("Invariant violation: {}. State: {:?}", message, result);
    Error::InvariantViolation(message)
}

/// Checks a finished result against the invariants every result must hold.
pub fn validate_result(result: &ClassificationResult, reference: &ReferenceData) -> Result<()> {
    let ratio_sum = result.profile.ratio_sum();
    if (ratio_sum - PERCENT_TOTAL).abs() > RATIO_SUM_EPSILON {
        return Err(violation(
            result,
            format!("normalized needs + wants + savings = {}", ratio_sum),
        ));
    }

    let granular_sum = result.profile.granular_sum();
    if granular_sum != 0.0 && (granular_sum - PERCENT_TOTAL).abs() > RATIO_SUM_EPSILON {
        return Err(violation(
            result,
            format!("normalized granular shares sum to {}", granular_sum),
        ));
    }

    let weights = &result.allocation.weights;
    if weights.total() != dec!(100) {
        return Err(violation(
            result,
            format!("allocation sums to {}", weights.total()),
        ));
    }

    for (class, value) in weights.iter() {
        let bound = reference.bounds.range(class);
        if value < Decimal::ZERO || !bound.contains(value) {
            return Err(violation(
                result,
                format!(
                    "{} allocation {} outside [{}, {}]",
                    class, value, bound.min, bound.max
                ),
            ));
        }
    }

    if !reference.personas.contains(&result.persona_id) {
        return Err(violation(
            result,
            format!("persona '{}' is not in the persona set", result.persona_id),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PersonaEngine;
    use crate::profile::{SpendCategory, UserFinancialProfile};

    fn valid_result() -> (ClassificationResult, ReferenceData) {
        let engine = PersonaEngine::new(ReferenceData::default()).unwrap();
        let profile = UserFinancialProfile::new(800_000.0, "kerala")
            .with_shares(70.0, 10.0, 20.0)
            .with_granular(SpendCategory::Dining, 100.0)
            .with_goal("FG001", 2);
        let result = engine.classify_selected(&profile).unwrap();
        (result, engine.reference().clone())
    }

    #[test]
    fn test_valid_result_passes() {
        let (result, reference) = valid_result();
        assert!(validate_result(&result, &reference).is_ok());
    }

    #[test]
    fn test_allocation_total_must_be_exact() {
        let (mut result, reference) = valid_result();
        result.allocation.weights.liquid += dec!(0.0001);
        assert!(matches!(
            validate_result(&result, &reference),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_bounds_are_checked() {
        let (mut result, reference) = valid_result();
        // move weight into gold past its ceiling, keeping the total at 100
        let shift = dec!(25) - result.allocation.weights.gold;
        result.allocation.weights.gold = dec!(25);
        result.allocation.weights.fixed_deposit -= shift;
        assert_eq!(result.allocation.weights.total(), dec!(100));
        let err = validate_result(&result, &reference).unwrap_err();
        assert!(err.to_string().contains("GOLD allocation 25"));
    }

    #[test]
    fn test_unknown_persona_is_violation() {
        let (mut result, reference) = valid_result();
        result.persona_id = "ghost".to_string();
        assert!(validate_result(&result, &reference)
            .unwrap_err()
            .to_string()
            .contains("ghost"));
    }

    #[test]
    fn test_ratio_sum_is_rechecked() {
        let (mut result, reference) = valid_result();
        result.profile.needs += 0.01;
        assert!(validate_result(&result, &reference).is_err());
    }
}
