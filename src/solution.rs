//! Result record handed to external reporters.

use crate::ga::Individual;
use crate::instance::Instance;

/// Load of one resource against its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceReport {
    /// Amount consumed by the selection.
    pub used: u64,

    /// Available amount.
    pub capacity: u64,
}

impl ResourceReport {
    /// Unused capacity.
    pub fn slack(&self) -> u64 {
        self.capacity.saturating_sub(self.used)
    }
}

/// Final selection with its profit and per-resource usage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MkpSolution {
    /// Indices of selected items, ascending (0-based).
    pub selected: Vec<usize>,

    /// Total profit.
    pub profit: u64,

    /// One entry per resource.
    pub resources: Vec<ResourceReport>,

    /// Reference optimum carried by the instance, if any.
    pub known_optimum: Option<u64>,

    /// `|known_optimum - profit|`, when the optimum is known.
    pub gap: Option<u64>,
}

impl MkpSolution {
    /// Builds the report for `individual` on `instance`.
    pub fn from_individual(instance: &Instance, individual: &Individual) -> Self {
        let usage = instance.usage_of(&individual.genes);
        let profit = instance.total_profit(&individual.genes);
        let resources = usage
            .loads()
            .iter()
            .zip(instance.capacities())
            .map(|(&used, &capacity)| ResourceReport { used, capacity })
            .collect();
        let known_optimum = instance.known_optimum();

        Self {
            selected: individual.selected(),
            profit,
            resources,
            known_optimum,
            gap: known_optimum.map(|opt| opt.abs_diff(profit)),
        }
    }

    /// Returns `true` if every resource is within capacity.
    pub fn is_feasible(&self) -> bool {
        self.resources.iter().all(|r| r.used <= r.capacity)
    }
}
