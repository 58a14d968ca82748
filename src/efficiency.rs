//! Item efficiency scores and the deterministic orders derived from them.
//!
//! Repair drops the least efficient selected item first; local search adds
//! the most efficient unselected item first. Both orders break ties on the
//! lower item index, so the whole pipeline is deterministic once the random
//! operators are fixed.

use crate::instance::Instance;
use std::cmp::Ordering;

/// How an item's profit is weighed against its resource consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EfficiencyMetric {
    /// `profit[j] / max(1, Σ_i consumption[i][j])`.
    ///
    /// The ratio used by the surrogate relaxation: all constraints are
    /// folded into one and every unit of every resource counts the same.
    #[default]
    SurrogateRatio,

    /// `profit[j] / Σ_i (consumption[i][j] / capacity[i])`.
    ///
    /// Each consumption is scaled by the capacity of its resource, so
    /// scarce resources weigh more than plentiful ones.
    NormalizedRatio,
}

impl EfficiencyMetric {
    /// Score of item `j` under this metric.
    pub fn score(self, instance: &Instance, j: usize) -> f64 {
        let profit = instance.profit(j) as f64;
        match self {
            EfficiencyMetric::SurrogateRatio => {
                let total: u64 = instance.item_weights(j).iter().sum();
                profit / total.max(1) as f64
            }
            EfficiencyMetric::NormalizedRatio => {
                let load: f64 = instance
                    .item_weights(j)
                    .iter()
                    .zip(instance.capacities())
                    .map(|(&w, &cap)| w as f64 / cap as f64)
                    .sum();
                // Every item consumes something, so load > 0.
                profit / load
            }
        }
    }
}

/// Precomputed efficiency scores and orders for one instance.
#[derive(Debug, Clone)]
pub struct Efficiency {
    scores: Vec<f64>,
    removal: Vec<usize>,
    insertion: Vec<usize>,
}

impl Efficiency {
    /// Scores every item and sorts the two traversal orders.
    pub fn new(instance: &Instance, metric: EfficiencyMetric) -> Self {
        let scores: Vec<f64> = (0..instance.n_items())
            .map(|j| metric.score(instance, j))
            .collect();

        let mut removal: Vec<usize> = (0..scores.len()).collect();
        removal.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]).then(a.cmp(&b)));

        let mut insertion: Vec<usize> = (0..scores.len()).collect();
        insertion.sort_by(|&a, &b| by_descending_score(&scores, a, b));

        Self {
            scores,
            removal,
            insertion,
        }
    }

    /// Score of item `j`.
    pub fn score(&self, j: usize) -> f64 {
        self.scores[j]
    }

    /// Items by ascending score, lower index first among equals.
    pub fn removal_order(&self) -> &[usize] {
        &self.removal
    }

    /// Items by descending score, lower index first among equals.
    pub fn insertion_order(&self) -> &[usize] {
        &self.insertion
    }
}

fn by_descending_score(scores: &[f64], a: usize, b: usize) -> Ordering {
    scores[b].total_cmp(&scores[a]).then(a.cmp(&b))
}
