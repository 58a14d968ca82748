//! Individuals and populations.
//!
//! An [`Individual`] is a bit vector over items plus its cached fitness and
//! feasibility flag. Operators work on cloned gene vectors; the live
//! [`Population`] is only ever touched by the controller.

/// One candidate selection.
///
/// `fitness` and `feasible` are only meaningful after the individual has
/// been repaired and evaluated; a freshly built individual is flagged
/// infeasible with zero fitness.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// `genes[j]` is `true` when item `j` is selected.
    pub genes: Vec<bool>,

    /// Total profit of the selected items.
    pub fitness: u64,

    /// Whether every capacity is respected.
    pub feasible: bool,
}

impl Individual {
    /// Wraps a raw (unrepaired) gene vector.
    pub fn new(genes: Vec<bool>) -> Self {
        Self {
            genes,
            fitness: 0,
            feasible: false,
        }
    }

    /// Indices of the selected items, ascending.
    pub fn selected(&self) -> Vec<usize> {
        self.genes
            .iter()
            .enumerate()
            .filter(|(_, &g)| g)
            .map(|(j, _)| j)
            .collect()
    }

    /// Number of selected items.
    pub fn selected_count(&self) -> usize {
        self.genes.iter().filter(|&&g| g).count()
    }
}

/// Fixed-size ordered collection of individuals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Wraps a non-empty vector of individuals.
    ///
    /// # Panics
    /// Panics if `individuals` is empty.
    pub fn new(individuals: Vec<Individual>) -> Self {
        assert!(!individuals.is_empty(), "population must not be empty");
        Self { individuals }
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Always `false`: a population holds at least one individual.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The individuals, in order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Individual at `idx`.
    pub fn get(&self, idx: usize) -> &Individual {
        &self.individuals[idx]
    }

    /// Index of the highest-fitness individual, lower index on ties.
    pub fn best_index(&self) -> usize {
        best_index(&self.individuals)
    }

    /// The highest-fitness individual.
    pub fn best(&self) -> &Individual {
        &self.individuals[self.best_index()]
    }

    /// Mean fitness, for logging.
    pub fn mean_fitness(&self) -> f64 {
        let total: u128 = self.individuals.iter().map(|i| i.fitness as u128).sum();
        total as f64 / self.individuals.len() as f64
    }

    /// Returns `true` if every individual is flagged feasible.
    pub fn all_feasible(&self) -> bool {
        self.individuals.iter().all(|i| i.feasible)
    }

    /// Indices of the `k` best individuals, best first.
    pub fn top_indices(&self, k: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.individuals.len()).collect();
        order.sort_by(|&a, &b| {
            self.individuals[b]
                .fitness
                .cmp(&self.individuals[a].fitness)
                .then(a.cmp(&b))
        });
        order.truncate(k);
        order
    }
}

/// Index of the highest-fitness individual in a non-empty slice, lower index
/// on ties.
pub(crate) fn best_index(individuals: &[Individual]) -> usize {
    let mut best = 0;
    for (idx, ind) in individuals.iter().enumerate().skip(1) {
        if ind.fitness > individuals[best].fitness {
            best = idx;
        }
    }
    best
}

/// Index of the lowest-fitness individual among those not `protected`,
/// higher index on ties.
pub(crate) fn worst_unprotected(individuals: &[Individual], protected: &[bool]) -> Option<usize> {
    let mut worst: Option<usize> = None;
    for (idx, ind) in individuals.iter().enumerate() {
        if protected[idx] {
            continue;
        }
        match worst {
            Some(w) if ind.fitness > individuals[w].fitness => {}
            _ => worst = Some(idx),
        }
    }
    worst
}
