//! Greedy constructive heuristics.
//!
//! Single-shot constructions that produce a good feasible selection without
//! any search. The surrogate greedy can seed the initial population; the
//! random-order greedy is a cheap randomized baseline.
//!
//! # References
//!
//! - Glover (1965), "A Multiphase-Dual Algorithm for the Zero-One Integer
//!   Programming Problem" (surrogate constraints)
//! - Pirkul (1987), "A Heuristic Solution Procedure for the Multiconstraint
//!   Zero-One Knapsack Problem"

use crate::efficiency::{Efficiency, EfficiencyMetric};
use crate::instance::Instance;
use crate::repair::Repairer;
use crate::usage::ResourceUsage;
use rand::seq::SliceRandom;
use rand::Rng;

/// Greedy solution of the surrogate relaxation, repaired for the real
/// constraints.
///
/// All constraints are summed into one (weight `Σ_i c_ij`, capacity
/// `Σ_i b_i`); items are taken by descending profit/weight while the
/// surrogate capacity allows. The result usually overloads some resource
/// and is handed to `repairer`.
pub fn surrogate_greedy(instance: &Instance, repairer: &Repairer<'_>) -> Vec<bool> {
    let order = Efficiency::new(instance, EfficiencyMetric::SurrogateRatio);
    let mut remaining = instance
        .capacities()
        .iter()
        .fold(0u64, |acc, &c| acc.saturating_add(c));

    let mut genes = vec![false; instance.n_items()];
    for &j in order.insertion_order() {
        let weight: u64 = instance.item_weights(j).iter().sum();
        if weight <= remaining {
            genes[j] = true;
            remaining -= weight;
        }
    }

    let repaired = repairer.repair(&mut genes);
    tracing::debug!(
        removed = repaired.removed,
        profit = instance.total_profit(&genes),
        "surrogate greedy construction"
    );
    genes
}

/// Visits items in random order and keeps each one that still fits.
///
/// Always feasible and maximal: no unselected item fits afterwards.
pub fn random_order_greedy<R: Rng>(instance: &Instance, rng: &mut R) -> Vec<bool> {
    let mut order: Vec<usize> = (0..instance.n_items()).collect();
    order.shuffle(rng);

    let mut genes = vec![false; instance.n_items()];
    let mut usage = ResourceUsage::empty(instance);
    for j in order {
        if usage.fits(instance, j) {
            genes[j] = true;
            usage.add(instance, j);
        }
    }
    genes
}
