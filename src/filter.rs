//! Ordering, capping and waste removal for qualifying solutions

use std::cmp::Ordering;

use crate::models::{Solution, SolutionSet};

/// Most solutions ever returned for one query
pub const MAX_SOLUTIONS: usize = 20;

/// Lightest first, then fewer boosters, fuel tanks and oxidizer tanks
pub fn compare(a: &Solution, b: &Solution) -> Ordering {
    a.weight
        .total_cmp(&b.weight)
        .then(a.booster_count.cmp(&b.booster_count))
        .then(a.fuel_count.cmp(&b.fuel_count))
        .then(a.oxidizer_count.cmp(&b.oxidizer_count))
}

/// Order, cap and optionally drop wasteful solutions
///
/// A solution is wasteful when another one is no heavier and uses no more
/// boosters. Everything that can dominate a solution sorts before it, so
/// filtering inside the capped window gives the same answer as filtering
/// the whole list and keeps the result a subsequence of the wasteful one.
pub fn select(mut solutions: Vec<Solution>, allow_waste: bool) -> SolutionSet {
    solutions.sort_by(compare);
    solutions.truncate(MAX_SOLUTIONS);

    if !allow_waste {
        let mut fewest_boosters = u32::MAX;
        solutions.retain(|solution| {
            // Earlier entries are no heavier; any with <= boosters dominates or ties
            if solution.booster_count < fewest_boosters {
                fewest_boosters = solution.booster_count;
                true
            } else {
                false
            }
        });
    }

    SolutionSet::new(solutions)
}
