//! Solver configuration.
//!
//! [`MkpConfig`] holds all parameters that control the evolutionary loop.

use crate::efficiency::EfficiencyMetric;
use crate::error::{MkpError, Result};
use std::time::Duration;

/// Configuration for the MKP genetic algorithm.
///
/// Controls population size, operator rates, elitism, termination
/// conditions, the repair heuristic and parallelism.
///
/// # Defaults
///
/// ```
/// use u_mkp::MkpConfig;
///
/// let config = MkpConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// assert_eq!(config.elite_count, 1);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_mkp::MkpConfig;
///
/// let config = MkpConfig::default()
///     .with_population_size(200)
///     .with_tournament_size(4)
///     .with_mutation_probability(0.02)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MkpConfig {
    /// Number of individuals in the population (P).
    ///
    /// Typical range: 50–500.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, the offspring are copies of the parents.
    pub crossover_probability: f64,

    /// Per-gene bit-flip probability (0.0–1.0).
    ///
    /// `None` uses `1 / N`, one expected flip per offspring.
    pub mutation_probability: Option<f64>,

    /// Number of contestants per tournament (≥ 1).
    pub tournament_size: usize,

    /// Number of best individuals carried unconditionally into the next
    /// generation. Must not exceed `population_size`.
    pub elite_count: usize,

    /// Number of consecutive generations without improvement of the best
    /// solution before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a seed from OS entropy; the drawn seed is logged.
    pub seed: Option<u64>,

    /// Optional wall-clock budget.
    ///
    /// Checked at each generation boundary, so the run may exceed the budget
    /// by up to one generation's worth of work.
    pub time_budget: Option<Duration>,

    /// Probability that a gene is `true` in a random initial individual.
    pub initial_density: f64,

    /// Item ranking used by repair and local search.
    pub efficiency_metric: EfficiencyMetric,

    /// Seeds the initial population with the surrogate-greedy solution.
    pub seed_with_greedy: bool,

    /// Whether to repair and evaluate offspring in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature. Results are identical
    /// either way for a fixed seed.
    pub parallel: bool,
}

impl Default for MkpConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            crossover_probability: 0.9,
            mutation_probability: None,
            tournament_size: 3,
            elite_count: 1,
            stagnation_limit: 50,
            seed: None,
            time_budget: None,
            initial_density: 0.5,
            efficiency_metric: EfficiencyMetric::default(),
            seed_with_greedy: false,
            parallel: true,
        }
    }
}

impl MkpConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = Some(p.clamp(0.0, 1.0));
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the number of elites.
    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Sets the initial gene density.
    pub fn with_initial_density(mut self, density: f64) -> Self {
        self.initial_density = density.clamp(0.0, 1.0);
        self
    }

    /// Sets the efficiency metric used by repair and local search.
    pub fn with_efficiency_metric(mut self, metric: EfficiencyMetric) -> Self {
        self.efficiency_metric = metric;
        self
    }

    /// Enables or disables greedy seeding of the initial population.
    pub fn with_greedy_seed(mut self, enabled: bool) -> Self {
        self.seed_with_greedy = enabled;
        self
    }

    /// Enables or disables parallel offspring development.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Mutation probability for an instance with `n_items` items.
    pub fn effective_mutation_probability(&self, n_items: usize) -> f64 {
        self.mutation_probability
            .unwrap_or(1.0 / n_items.max(1) as f64)
    }

    /// Preset for fast optimization: small population, few generations.
    ///
    /// - Population: 50, Generations: 100, Time budget: 10s
    /// - Stagnation limit: 20
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            stagnation_limit: 20,
            time_budget: Some(Duration::from_secs(10)),
            ..Self::default()
        }
    }

    /// Preset for balanced optimization.
    ///
    /// - Population: 100, Generations: 300, Time budget: 30s
    /// - Stagnation limit: 50
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            stagnation_limit: 50,
            time_budget: Some(Duration::from_secs(30)),
            ..Self::default()
        }
    }

    /// Preset for quality optimization: large population, many generations,
    /// greedy seeding.
    ///
    /// - Population: 150, Generations: 500, Time budget: 60s
    /// - Stagnation limit: 80
    pub fn quality() -> Self {
        Self {
            population_size: 150,
            max_generations: 500,
            stagnation_limit: 80,
            time_budget: Some(Duration::from_secs(60)),
            seed_with_greedy: true,
            ..Self::default()
        }
    }

    /// Selects a preset from the number of items.
    ///
    /// - `n_items < 50` → [`fast()`](Self::fast)
    /// - `50 ≤ n_items < 200` → [`balanced()`](Self::balanced)
    /// - `n_items ≥ 200` → [`quality()`](Self::quality)
    pub fn auto_select(n_items: usize) -> Self {
        if n_items < 50 {
            Self::fast()
        } else if n_items < 200 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MkpError::InvalidConfiguration`] describing the first
    /// out-of-range parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        if !is_probability(self.crossover_probability) {
            return Err(invalid("crossover_probability must be in [0, 1]"));
        }
        if let Some(p) = self.mutation_probability {
            if !is_probability(p) {
                return Err(invalid("mutation_probability must be in [0, 1]"));
            }
        }
        if self.tournament_size == 0 {
            return Err(invalid("tournament_size must be at least 1"));
        }
        if self.elite_count > self.population_size {
            return Err(invalid("elite_count exceeds population_size"));
        }
        if !is_probability(self.initial_density) {
            return Err(invalid("initial_density must be in [0, 1]"));
        }
        if self.time_budget == Some(Duration::ZERO) {
            return Err(invalid("time_budget must be positive or None"));
        }
        Ok(())
    }
}

fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

fn invalid(msg: &str) -> MkpError {
    MkpError::InvalidConfiguration(msg.into())
}
