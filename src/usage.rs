//! Per-resource load accumulators.

use crate::instance::Instance;

/// Load of each resource under a selection, alongside the capacities.
///
/// Recomputed per individual during repair and local search; never shared
/// between individuals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUsage {
    loads: Vec<u64>,
    capacities: Vec<u64>,
}

impl ResourceUsage {
    /// Usage of the empty selection.
    pub fn empty(instance: &Instance) -> Self {
        Self {
            loads: vec![0; instance.n_resources()],
            capacities: instance.capacities().to_vec(),
        }
    }

    /// Usage of `genes`.
    ///
    /// # Panics
    /// Panics if `genes.len() != instance.n_items()`.
    pub fn of(instance: &Instance, genes: &[bool]) -> Self {
        assert_eq!(
            genes.len(),
            instance.n_items(),
            "gene count must match item count"
        );
        let mut usage = Self::empty(instance);
        for (j, _) in genes.iter().enumerate().filter(|(_, &g)| g) {
            usage.add(instance, j);
        }
        usage
    }

    /// Accounts for item `j` being selected.
    pub fn add(&mut self, instance: &Instance, j: usize) {
        for (load, &w) in self.loads.iter_mut().zip(instance.item_weights(j)) {
            *load += w;
        }
    }

    /// Accounts for item `j` being deselected.
    ///
    /// The caller must only remove items that were previously added.
    pub fn remove(&mut self, instance: &Instance, j: usize) {
        for (load, &w) in self.loads.iter_mut().zip(instance.item_weights(j)) {
            *load -= w;
        }
    }

    /// Returns `true` if item `j` can be added without exceeding any capacity.
    pub fn fits(&self, instance: &Instance, j: usize) -> bool {
        self.loads
            .iter()
            .zip(&self.capacities)
            .zip(instance.item_weights(j))
            .all(|((&load, &cap), &w)| load + w <= cap)
    }

    /// Returns `true` if every load is within its capacity.
    pub fn is_feasible(&self) -> bool {
        self.loads
            .iter()
            .zip(&self.capacities)
            .all(|(&load, &cap)| load <= cap)
    }

    /// Current loads, one per resource.
    pub fn loads(&self) -> &[u64] {
        &self.loads
    }

    /// Remaining capacity of resource `i` (zero when overloaded).
    pub fn slack(&self, i: usize) -> u64 {
        self.capacities[i].saturating_sub(self.loads[i])
    }

    /// Total amount by which loads exceed capacities.
    pub fn excess(&self) -> u64 {
        self.loads
            .iter()
            .zip(&self.capacities)
            .map(|(&load, &cap)| load.saturating_sub(cap))
            .fold(0u64, u64::saturating_add)
    }
}
