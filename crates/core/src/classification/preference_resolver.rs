//! Dominant "wants" sub-category resolution.

use std::collections::BTreeMap;

use crate::profile::SpendCategory;

use super::classification_model::DominantCategory;

/// Returns the sub-category with the largest share.
///
/// Ties go to the higher-priority category (see [`SpendCategory::ALL`]),
/// independent of map iteration order. Empty or all-zero shares resolve to
/// [`DominantCategory::None`].
pub fn resolve_dominant_category(shares: &BTreeMap<SpendCategory, f64>) -> DominantCategory {
    let mut winner: Option<(SpendCategory, f64)> = None;

    for category in SpendCategory::ALL {
        let share = shares.get(&category).copied().unwrap_or(0.0);
        if share <= 0.0 {
            continue;
        }
        match winner {
            Some((_, best)) if share <= best => {}
            _ => winner = Some((category, share)),
        }
    }

    winner
        .map(|(category, _)| DominantCategory::from(category))
        .unwrap_or(DominantCategory::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shares(entries: &[(SpendCategory, f64)]) -> BTreeMap<SpendCategory, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_largest_share_wins() {
        let resolved = resolve_dominant_category(&shares(&[
            (SpendCategory::Shopping, 20.0),
            (SpendCategory::Travel, 50.0),
            (SpendCategory::Dining, 30.0),
        ]));
        assert_eq!(resolved, DominantCategory::Travel);
    }

    #[test]
    fn test_ties_use_fixed_priority() {
        let resolved = resolve_dominant_category(&shares(&[
            (SpendCategory::Entertainment, 50.0),
            (SpendCategory::Dining, 50.0),
        ]));
        assert_eq!(resolved, DominantCategory::Dining);

        let resolved = resolve_dominant_category(&shares(&[
            (SpendCategory::Other, 25.0),
            (SpendCategory::Travel, 25.0),
            (SpendCategory::Entertainment, 25.0),
            (SpendCategory::Shopping, 25.0),
        ]));
        assert_eq!(resolved, DominantCategory::Shopping);
    }

    #[test]
    fn test_zero_or_empty_is_none() {
        assert_eq!(
            resolve_dominant_category(&BTreeMap::new()),
            DominantCategory::None
        );
        assert_eq!(
            resolve_dominant_category(&shares(&[
                (SpendCategory::Shopping, 0.0),
                (SpendCategory::Dining, 0.0),
            ])),
            DominantCategory::None
        );
    }
}
