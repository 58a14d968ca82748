//! Problem instance.
//!
//! An [`Instance`] is the immutable description of a 0/1 multidimensional
//! knapsack problem:
//!
//! ```text
//! maximize    Σ_j profit[j] · x[j]
//! subject to  Σ_j consumption[i][j] · x[j] ≤ capacity[i]   for every resource i
//!             x[j] ∈ {0, 1}
//! ```
//!
//! Construction validates the data once; every other component receives the
//! instance by shared reference and never re-checks it.

use crate::error::{MkpError, Result};
use crate::usage::ResourceUsage;

/// Raw instance record as supplied by an external loader.
///
/// `consumption` is resource-major: `consumption[i][j]` is the amount of
/// resource `i` used by item `j`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceData {
    /// Profit of each item (length N).
    pub profits: Vec<u64>,

    /// Capacity of each resource (length M).
    pub capacities: Vec<u64>,

    /// M×N consumption matrix.
    pub consumption: Vec<Vec<u64>>,

    /// Reference optimum, when the instance comes from a benchmark library.
    #[cfg_attr(feature = "serde", serde(default))]
    pub known_optimum: Option<u64>,
}

/// A validated MKP instance.
///
/// # Examples
///
/// ```
/// use u_mkp::Instance;
///
/// let instance = Instance::new(
///     vec![10, 6, 8, 4],
///     vec![10],
///     vec![vec![5, 4, 3, 2]],
/// ).unwrap();
/// assert_eq!(instance.n_items(), 4);
/// assert_eq!(instance.n_resources(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "InstanceData", into = "InstanceData")
)]
pub struct Instance {
    profits: Vec<u64>,
    capacities: Vec<u64>,
    /// Item-major copy of the consumption matrix: the column of item `j`
    /// lives at `weights[j * m .. (j + 1) * m]`.
    weights: Vec<u64>,
    known_optimum: Option<u64>,
}

impl Instance {
    /// Builds and validates an instance.
    ///
    /// # Errors
    ///
    /// Returns [`MkpError::InvalidInstance`] when N or M is zero, when the
    /// matrix dimensions disagree with the vectors, when a profit or capacity
    /// is zero, when an item consumes no resource at all, or when a sum over
    /// the data overflows `u64`.
    pub fn new(
        profits: Vec<u64>,
        capacities: Vec<u64>,
        consumption: Vec<Vec<u64>>,
    ) -> Result<Self> {
        Self::from_data(InstanceData {
            profits,
            capacities,
            consumption,
            known_optimum: None,
        })
    }

    /// Builds an instance from a loader record.
    pub fn from_data(data: InstanceData) -> Result<Self> {
        let InstanceData {
            profits,
            capacities,
            consumption,
            known_optimum,
        } = data;
        let n = profits.len();
        let m = capacities.len();

        if n == 0 {
            return Err(invalid("instance has no items"));
        }
        if m == 0 {
            return Err(invalid("instance has no resources"));
        }
        if consumption.len() != m {
            return Err(invalid(format!(
                "consumption matrix has {} rows, expected {m}",
                consumption.len()
            )));
        }
        for (i, row) in consumption.iter().enumerate() {
            if row.len() != n {
                return Err(invalid(format!(
                    "consumption row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
        }
        if let Some(j) = profits.iter().position(|&p| p == 0) {
            return Err(invalid(format!("item {j} has non-positive profit")));
        }
        if let Some(i) = capacities.iter().position(|&c| c == 0) {
            return Err(invalid(format!("resource {i} has non-positive capacity")));
        }
        profits
            .iter()
            .try_fold(0u64, |acc, &p| acc.checked_add(p))
            .ok_or_else(|| invalid("total profit overflows u64"))?;
        for (i, row) in consumption.iter().enumerate() {
            row.iter()
                .try_fold(0u64, |acc, &c| acc.checked_add(c))
                .ok_or_else(|| {
                    invalid(format!("total consumption of resource {i} overflows u64"))
                })?;
        }

        let mut weights = vec![0u64; n * m];
        for (i, row) in consumption.iter().enumerate() {
            for (j, &c) in row.iter().enumerate() {
                weights[j * m + i] = c;
            }
        }
        for (j, column) in weights.chunks_exact(m).enumerate() {
            if column.iter().all(|&c| c == 0) {
                return Err(invalid(format!("item {j} consumes no resource")));
            }
            column
                .iter()
                .try_fold(0u64, |acc, &c| acc.checked_add(c))
                .ok_or_else(|| invalid(format!("total consumption of item {j} overflows u64")))?;
        }

        Ok(Self {
            profits,
            capacities,
            weights,
            known_optimum,
        })
    }

    /// Attaches a reference optimum used for gap reporting.
    pub fn with_known_optimum(mut self, optimum: u64) -> Self {
        self.known_optimum = Some(optimum);
        self
    }

    /// Number of items (N).
    pub fn n_items(&self) -> usize {
        self.profits.len()
    }

    /// Number of resources (M).
    pub fn n_resources(&self) -> usize {
        self.capacities.len()
    }

    /// Profit of item `j`.
    pub fn profit(&self, j: usize) -> u64 {
        self.profits[j]
    }

    /// All profits.
    pub fn profits(&self) -> &[u64] {
        &self.profits
    }

    /// Capacity of resource `i`.
    pub fn capacity(&self, i: usize) -> u64 {
        self.capacities[i]
    }

    /// All capacities.
    pub fn capacities(&self) -> &[u64] {
        &self.capacities
    }

    /// Amount of resource `i` consumed by item `j`.
    pub fn consumption(&self, i: usize, j: usize) -> u64 {
        self.weights[j * self.n_resources() + i]
    }

    /// Consumption column of item `j` (one entry per resource).
    pub fn item_weights(&self, j: usize) -> &[u64] {
        let m = self.n_resources();
        &self.weights[j * m..(j + 1) * m]
    }

    /// Reference optimum, if known.
    pub fn known_optimum(&self) -> Option<u64> {
        self.known_optimum
    }

    /// Resource usage of a selection.
    ///
    /// # Panics
    /// Panics if `genes.len() != n_items()`.
    pub fn usage_of(&self, genes: &[bool]) -> ResourceUsage {
        ResourceUsage::of(self, genes)
    }

    /// Returns `true` if the selection satisfies every capacity.
    pub fn is_feasible(&self, genes: &[bool]) -> bool {
        self.usage_of(genes).is_feasible()
    }

    /// Sum of profits of selected items, regardless of feasibility.
    pub fn total_profit(&self, genes: &[bool]) -> u64 {
        assert_eq!(genes.len(), self.n_items(), "gene count must match item count");
        genes
            .iter()
            .zip(&self.profits)
            .filter(|(&selected, _)| selected)
            .map(|(_, &p)| p)
            .sum()
    }

    /// Returns `true` if selecting every item is feasible.
    pub fn is_trivially_feasible(&self) -> bool {
        (0..self.n_resources()).all(|i| {
            (0..self.n_items())
                .map(|j| self.consumption(i, j))
                .sum::<u64>()
                <= self.capacity(i)
        })
    }
}

impl TryFrom<InstanceData> for Instance {
    type Error = MkpError;

    fn try_from(data: InstanceData) -> Result<Self> {
        Self::from_data(data)
    }
}

impl From<Instance> for InstanceData {
    fn from(instance: Instance) -> Self {
        let consumption = (0..instance.n_resources())
            .map(|i| {
                (0..instance.n_items())
                    .map(|j| instance.consumption(i, j))
                    .collect()
            })
            .collect();
        InstanceData {
            profits: instance.profits,
            capacities: instance.capacities,
            consumption,
            known_optimum: instance.known_optimum,
        }
    }
}

fn invalid(msg: impl Into<String>) -> MkpError {
    MkpError::InvalidInstance(msg.into())
}
