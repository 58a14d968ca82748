//! Generational controller.
//!
//! [`Evolution`] is the controller state machine:
//!
//! ```text
//! Initializing ──step──▶ Evolving ──step──▶ … ──▶ Terminated(reason)
//! ```
//!
//! Each generation draws every random decision (selection, crossover,
//! mutation) sequentially from the master generator, then repairs, fills and
//! evaluates the offspring, optionally in parallel. Since the parallel phase
//! consumes no randomness, a fixed seed gives the same run with or without
//! rayon.
//!
//! [`MkpRunner`] drives an [`Evolution`] to termination.

use super::config::MkpConfig;
use super::operators::{bit_flip_mutation, random_genes, uniform_crossover};
use super::selection::tournament;
use super::types::{worst_unprotected, Individual, Population};
use crate::construct::surrogate_greedy;
use crate::error::{MkpError, Result};
use crate::evaluate::evaluate;
use crate::instance::Instance;
use crate::local_search;
use crate::random::{rng_for, SolverRng};
use crate::repair::Repairer;
use crate::solution::MkpSolution;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// `max_generations` generations were evolved.
    MaxGenerations,
    /// The best solution did not improve for `stagnation_limit` generations.
    Stagnation,
    /// The time budget expired.
    TimeBudget,
    /// The run was cancelled externally.
    Cancelled,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No population yet; the next step builds it.
    Initializing,
    /// The population is live; the next step evolves one generation.
    Evolving,
    /// The run is over; further steps are no-ops.
    Terminated(Termination),
}

/// Result of an MKP optimization run.
#[derive(Debug, Clone)]
pub struct MkpResult {
    /// The best individual found during the entire run.
    pub best: Individual,

    /// Best fitness value (same as `best.fitness`).
    pub best_fitness: u64,

    /// Number of generations evolved after initialization.
    pub generations: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Best fitness after initialization and after each generation.
    pub fitness_history: Vec<u64>,

    /// Seed of the master generator.
    pub seed: u64,

    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl MkpResult {
    /// Builds the report for the best individual.
    pub fn solution(&self, instance: &Instance) -> MkpSolution {
        MkpSolution::from_individual(instance, &self.best)
    }
}

/// Stepwise evolutionary controller.
///
/// Owns the population exclusively; operators only ever see cloned gene
/// vectors.
///
/// # Usage
///
/// ```
/// use u_mkp::{Evolution, Instance, MkpConfig, Phase};
///
/// let instance = Instance::new(vec![10, 6, 8, 4], vec![10], vec![vec![5, 4, 3, 2]]).unwrap();
/// let config = MkpConfig::default().with_population_size(10).with_max_generations(5).with_seed(1);
///
/// let mut evolution = Evolution::new(&instance, &config).unwrap();
/// assert_eq!(evolution.phase(), Phase::Initializing);
/// while !evolution.is_terminated() {
///     evolution.step().unwrap();
/// }
/// assert_eq!(evolution.into_result().unwrap().best_fitness, 22);
/// ```
pub struct Evolution<'a> {
    instance: &'a Instance,
    config: MkpConfig,
    repairer: Repairer<'a>,
    rng: SolverRng,
    seed: u64,
    mutation_probability: f64,
    phase: Phase,
    population: Option<Population>,
    best: Option<Individual>,
    generation: usize,
    stagnation: usize,
    fitness_history: Vec<u64>,
    started: Instant,
}

impl<'a> Evolution<'a> {
    /// Validates the configuration and prepares a run.
    ///
    /// # Errors
    ///
    /// Returns [`MkpError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(instance: &'a Instance, config: &MkpConfig) -> Result<Self> {
        config.validate()?;
        let (rng, seed) = rng_for(config.seed);

        Ok(Self {
            instance,
            config: config.clone(),
            repairer: Repairer::new(instance, config.efficiency_metric),
            rng,
            seed,
            mutation_probability: config.effective_mutation_probability(instance.n_items()),
            phase: Phase::Initializing,
            population: None,
            best: None,
            generation: 0,
            stagnation: 0,
            fitness_history: Vec::with_capacity(config.max_generations.min(1024) + 1),
            started: Instant::now(),
        })
    }

    /// Current state.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` once a stopping condition has been met.
    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Terminated(_))
    }

    /// Number of generations evolved so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best individual seen so far, once initialized.
    pub fn best(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    /// Current population, once initialized.
    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// Seed of the master generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advances the state machine by one transition.
    ///
    /// In `Initializing`, builds and evaluates the initial population. In
    /// `Evolving`, first checks the time budget, then evolves one generation
    /// and checks the stagnation and generation limits. In `Terminated`,
    /// does nothing.
    pub fn step(&mut self) -> Result<Phase> {
        match self.phase {
            Phase::Initializing => {
                self.initialize()?;
                self.phase = Phase::Evolving;
            }
            Phase::Evolving => {
                if self.budget_expired() {
                    self.terminate(Termination::TimeBudget);
                    return Ok(self.phase);
                }
                self.evolve_generation()?;
                if self.config.stagnation_limit > 0
                    && self.stagnation >= self.config.stagnation_limit
                {
                    self.terminate(Termination::Stagnation);
                } else if self.generation >= self.config.max_generations {
                    self.terminate(Termination::MaxGenerations);
                }
            }
            Phase::Terminated(_) => {}
        }
        Ok(self.phase)
    }

    /// Stops the run at the current generation boundary.
    pub fn cancel(&mut self) {
        if !self.is_terminated() {
            self.terminate(Termination::Cancelled);
        }
    }

    /// Consumes the controller and returns the best solution found.
    ///
    /// A run that is not yet terminated is reported as cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`MkpError::InternalInvariantViolation`] if the population was
    /// never initialized.
    pub fn into_result(self) -> Result<MkpResult> {
        let best = self.best.ok_or_else(|| {
            MkpError::InternalInvariantViolation("run ended before initialization".into())
        })?;
        let termination = match self.phase {
            Phase::Terminated(reason) => reason,
            _ => Termination::Cancelled,
        };
        Ok(MkpResult {
            best_fitness: best.fitness,
            best,
            generations: self.generation,
            termination,
            fitness_history: self.fitness_history,
            seed: self.seed,
            elapsed: self.started.elapsed(),
        })
    }

    fn initialize(&mut self) -> Result<()> {
        let n = self.instance.n_items();
        let size = self.config.population_size;

        let mut individuals: Vec<Individual> = (0..size)
            .map(|_| {
                Individual::new(random_genes(
                    n,
                    self.config.initial_density,
                    &mut self.rng,
                ))
            })
            .collect();

        if self.config.seed_with_greedy {
            let slot = self.rng.random_range(0..size);
            individuals[slot] = Individual::new(surrogate_greedy(self.instance, &self.repairer));
        }

        develop_all(&self.repairer, &mut individuals, self.config.parallel)?;

        let population = Population::new(individuals);
        let best = population.best().clone();
        tracing::info!(
            items = n,
            resources = self.instance.n_resources(),
            population = size,
            seed = self.seed,
            best = best.fitness,
            "initial population ready"
        );

        self.fitness_history.push(best.fitness);
        self.best = Some(best);
        self.population = Some(population);
        Ok(())
    }

    fn evolve_generation(&mut self) -> Result<()> {
        let previous = self.population.as_ref().ok_or_else(|| {
            MkpError::InternalInvariantViolation("evolving without a population".into())
        })?;
        let parents = previous.individuals();
        let size = self.config.population_size;
        let k = self.config.tournament_size;

        let mut offspring: Vec<Individual> = Vec::with_capacity(size);
        while offspring.len() < size {
            let a = tournament(parents, k, &mut self.rng);
            let b = tournament(parents, k, &mut self.rng);

            let (child1, child2) = if self.rng.random_bool(self.config.crossover_probability) {
                uniform_crossover(&parents[a].genes, &parents[b].genes, &mut self.rng)
            } else {
                (parents[a].genes.clone(), parents[b].genes.clone())
            };

            for mut genes in [child1, child2] {
                if offspring.len() >= size {
                    break;
                }
                bit_flip_mutation(&mut genes, self.mutation_probability, &mut self.rng);
                offspring.push(Individual::new(genes));
            }
        }

        develop_all(&self.repairer, &mut offspring, self.config.parallel)?;
        preserve_elites(previous, &mut offspring, self.config.elite_count);

        let population = Population::new(offspring);
        self.generation += 1;

        let gen_best = population.best();
        let best_fitness = self.best.as_ref().map_or(0, |b| b.fitness);
        if gen_best.fitness > best_fitness {
            self.best = Some(gen_best.clone());
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
        let best_fitness = self.best.as_ref().map_or(0, |b| b.fitness);
        self.fitness_history.push(best_fitness);

        tracing::debug!(
            generation = self.generation,
            best = best_fitness,
            generation_best = gen_best.fitness,
            mean = population.mean_fitness(),
            stagnation = self.stagnation,
            "generation complete"
        );

        self.population = Some(population);
        Ok(())
    }

    fn budget_expired(&self) -> bool {
        self.config
            .time_budget
            .is_some_and(|budget| self.started.elapsed() >= budget)
    }

    fn terminate(&mut self, reason: Termination) {
        self.phase = Phase::Terminated(reason);
        tracing::info!(
            ?reason,
            generations = self.generation,
            best = self.best.as_ref().map(|b| b.fitness),
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "run terminated"
        );
    }
}

/// Runs the MKP genetic algorithm to completion.
///
/// # Usage
///
/// ```
/// use u_mkp::{Instance, MkpConfig, MkpRunner};
///
/// let instance = Instance::new(vec![10, 6, 8, 4], vec![10], vec![vec![5, 4, 3, 2]]).unwrap();
/// let config = MkpConfig::default().with_population_size(20).with_seed(42);
/// let result = MkpRunner::run(&instance, &config).unwrap();
/// assert_eq!(result.best_fitness, 22);
/// ```
pub struct MkpRunner;

impl MkpRunner {
    /// Runs the GA optimization.
    ///
    /// # Errors
    ///
    /// Returns [`MkpError::InvalidConfiguration`] before any work if the
    /// configuration is invalid.
    pub fn run(instance: &Instance, config: &MkpConfig) -> Result<MkpResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// at the next generation boundary and returns the best solution found
    /// so far. Work inside a generation is never interrupted.
    #[tracing::instrument(
        level = "debug",
        name = "mkp_run",
        skip_all,
        fields(items = instance.n_items(), resources = instance.n_resources())
    )]
    pub fn run_with_cancel(
        instance: &Instance,
        config: &MkpConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MkpResult> {
        let mut evolution = Evolution::new(instance, config)?;
        evolution.step()?;

        while !evolution.is_terminated() {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    evolution.cancel();
                    break;
                }
            }
            evolution.step()?;
        }

        evolution.into_result()
    }
}

/// Repairs, fills and evaluates one raw individual.
fn develop(repairer: &Repairer<'_>, individual: &mut Individual) -> Result<()> {
    let instance = repairer.instance();
    let mut usage = repairer.repair(&mut individual.genes).usage;
    local_search::fill(
        instance,
        repairer.efficiency(),
        &mut individual.genes,
        &mut usage,
    );
    individual.feasible = usage.is_feasible();
    individual.fitness = evaluate(instance, individual)?;
    Ok(())
}

#[cfg(feature = "parallel")]
fn develop_all(
    repairer: &Repairer<'_>,
    individuals: &mut [Individual],
    parallel: bool,
) -> Result<()> {
    if parallel {
        individuals
            .par_iter_mut()
            .try_for_each(|ind| develop(repairer, ind))
    } else {
        individuals
            .iter_mut()
            .try_for_each(|ind| develop(repairer, ind))
    }
}

#[cfg(not(feature = "parallel"))]
fn develop_all(
    repairer: &Repairer<'_>,
    individuals: &mut [Individual],
    _parallel: bool,
) -> Result<()> {
    individuals
        .iter_mut()
        .try_for_each(|ind| develop(repairer, ind))
}

/// Carries the `count` best individuals of `previous` into `offspring`.
///
/// An elite already present (same genes) is kept where it is; otherwise it
/// replaces the worst offspring not already holding an elite.
fn preserve_elites(previous: &Population, offspring: &mut [Individual], count: usize) {
    let mut protected = vec![false; offspring.len()];
    for idx in previous.top_indices(count) {
        let elite = previous.get(idx);
        if let Some(pos) = offspring.iter().position(|o| o.genes == elite.genes) {
            protected[pos] = true;
            continue;
        }
        if let Some(worst) = worst_unprotected(offspring, &protected) {
            offspring[worst] = elite.clone();
            protected[worst] = true;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InstanceData;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn example() -> Instance {
        Instance::new(vec![10, 6, 8, 4], vec![10], vec![vec![5, 4, 3, 2]]).unwrap()
    }

    fn random_instance(n: usize, m: usize, seed: u64) -> Instance {
        let mut rng = create_rng(seed);
        let profits: Vec<u64> = (0..n).map(|_| rng.random_range(1..100)).collect();
        let consumption: Vec<Vec<u64>> = (0..m)
            .map(|_| (0..n).map(|_| rng.random_range(1..50)).collect())
            .collect();
        let capacities: Vec<u64> = consumption
            .iter()
            .map(|row| (row.iter().sum::<u64>() / 2).max(1))
            .collect();
        Instance::new(profits, capacities, consumption).unwrap()
    }

    fn brute_force(instance: &Instance) -> u64 {
        let n = instance.n_items();
        (0u32..1 << n)
            .map(|mask| (0..n).map(|j| mask & (1 << j) != 0).collect::<Vec<bool>>())
            .filter(|genes| instance.is_feasible(genes))
            .map(|genes| instance.total_profit(&genes))
            .max()
            .unwrap_or(0)
    }

    fn serial(config: MkpConfig) -> MkpConfig {
        config.with_parallel(false)
    }

    #[test]
    fn test_example_reaches_optimum() {
        let inst = example();
        assert_eq!(brute_force(&inst), 22);

        let config = serial(
            MkpConfig::default()
                .with_population_size(20)
                .with_max_generations(50)
                .with_seed(42),
        );
        let result = MkpRunner::run(&inst, &config).unwrap();
        assert_eq!(result.best_fitness, 22);
        assert_eq!(result.best.selected(), vec![0, 2, 3]);

        let solution = result.solution(&inst);
        assert_eq!(solution.profit, 22);
        assert_eq!(solution.resources[0].used, 10);
    }

    #[test]
    fn test_matches_brute_force_on_small_instances() {
        for seed in 0..5 {
            let inst = random_instance(12, 3, seed);
            let optimum = brute_force(&inst);
            let config = serial(
                MkpConfig::default()
                    .with_population_size(40)
                    .with_max_generations(200)
                    .with_stagnation_limit(60)
                    .with_seed(seed),
            );
            let result = MkpRunner::run(&inst, &config).unwrap();
            assert!(result.best_fitness <= optimum);
            assert!(
                result.best_fitness * 100 >= optimum * 95,
                "seed {seed}: {} vs optimum {optimum}",
                result.best_fitness
            );
        }
    }

    #[test]
    fn test_trivially_feasible_converges_to_total_profit() {
        let inst = Instance::new(
            vec![5, 7, 9, 11],
            vec![100, 100],
            vec![vec![1, 2, 3, 4], vec![4, 3, 2, 1]],
        )
        .unwrap();
        let config = serial(MkpConfig::default().with_population_size(10).with_seed(3));
        let result = MkpRunner::run(&inst, &config).unwrap();
        assert_eq!(result.best_fitness, 32);
        assert_eq!(result.best.genes, vec![true; 4]);
    }

    #[test]
    fn test_oversized_item_never_selected() {
        // Item 0 alone exceeds resource 0.
        let inst = Instance::new(
            vec![1000, 5, 6, 7, 8],
            vec![10, 20],
            vec![vec![11, 2, 3, 4, 5], vec![1, 1, 1, 1, 1]],
        )
        .unwrap();
        let config = serial(
            MkpConfig::default()
                .with_population_size(30)
                .with_max_generations(40)
                .with_mutation_probability(0.3)
                .with_seed(8),
        );
        let mut evolution = Evolution::new(&inst, &config).unwrap();
        while !evolution.is_terminated() {
            evolution.step().unwrap();
            let pop = evolution.population().unwrap();
            assert!(pop.individuals().iter().all(|ind| !ind.genes[0]));
        }
    }

    #[test]
    fn test_population_always_feasible() {
        let inst = random_instance(40, 5, 11);
        let config = serial(
            MkpConfig::default()
                .with_population_size(30)
                .with_max_generations(30)
                .with_seed(11),
        );
        let mut evolution = Evolution::new(&inst, &config).unwrap();
        while !evolution.is_terminated() {
            evolution.step().unwrap();
            let pop = evolution.population().unwrap();
            assert_eq!(pop.len(), 30);
            assert!(pop.all_feasible());
            for ind in pop.individuals() {
                assert!(inst.is_feasible(&ind.genes));
                assert_eq!(ind.fitness, inst.total_profit(&ind.genes));
            }
        }
    }

    #[test]
    fn test_phase_transitions() {
        let inst = example();
        let config = serial(
            MkpConfig::default()
                .with_population_size(6)
                .with_max_generations(2)
                .with_stagnation_limit(0)
                .with_seed(1),
        );
        let mut evolution = Evolution::new(&inst, &config).unwrap();
        assert_eq!(evolution.phase(), Phase::Initializing);
        assert!(evolution.best().is_none());

        assert_eq!(evolution.step().unwrap(), Phase::Evolving);
        assert!(evolution.best().is_some());
        assert_eq!(evolution.generation(), 0);

        assert_eq!(evolution.step().unwrap(), Phase::Evolving);
        assert_eq!(
            evolution.step().unwrap(),
            Phase::Terminated(Termination::MaxGenerations)
        );
        // Terminated is absorbing.
        assert_eq!(
            evolution.step().unwrap(),
            Phase::Terminated(Termination::MaxGenerations)
        );
        assert_eq!(evolution.generation(), 2);
    }

    #[test]
    fn test_fitness_history_monotonic() {
        let inst = random_instance(60, 4, 5);
        let config = serial(
            MkpConfig::default()
                .with_population_size(20)
                .with_max_generations(50)
                .with_stagnation_limit(0)
                .with_seed(5),
        );
        let result = MkpRunner::run(&inst, &config).unwrap();

        assert_eq!(result.termination, Termination::MaxGenerations);
        assert_eq!(result.generations, 50);
        assert_eq!(result.fitness_history.len(), 51);
        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0], "best fitness regressed: {window:?}");
        }
        assert_eq!(*result.fitness_history.last().unwrap(), result.best_fitness);
    }

    #[test]
    fn test_elite_survives_each_generation() {
        let inst = random_instance(30, 3, 21);
        let config = serial(
            MkpConfig::default()
                .with_population_size(12)
                .with_max_generations(25)
                .with_mutation_probability(0.5)
                .with_seed(21),
        );
        let mut evolution = Evolution::new(&inst, &config).unwrap();
        evolution.step().unwrap();
        while !evolution.is_terminated() {
            let previous_best = evolution.population().unwrap().best().clone();
            evolution.step().unwrap();
            let pop = evolution.population().unwrap();
            assert!(pop
                .individuals()
                .iter()
                .any(|ind| ind.genes == previous_best.genes));
            assert!(pop.best().fitness >= previous_best.fitness);
        }
    }

    #[test]
    fn test_stagnation_termination() {
        let inst = example();
        let config = serial(
            MkpConfig::default()
                .with_population_size(10)
                .with_max_generations(1000)
                .with_stagnation_limit(5)
                .with_seed(42),
        );
        let result = MkpRunner::run(&inst, &config).unwrap();
        assert_eq!(result.termination, Termination::Stagnation);
        assert!(result.generations < 1000);
    }

    #[test]
    fn test_time_budget_termination() {
        let inst = random_instance(200, 5, 2);
        let config = serial(
            MkpConfig::default()
                .with_population_size(20)
                .with_max_generations(usize::MAX)
                .with_stagnation_limit(0)
                .with_time_budget(Duration::from_millis(20))
                .with_seed(2),
        );
        let result = MkpRunner::run(&inst, &config).unwrap();
        assert_eq!(result.termination, Termination::TimeBudget);
        assert!(result.elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_cancellation() {
        let inst = random_instance(50, 3, 4);
        let config = serial(
            MkpConfig::default()
                .with_max_generations(10_000)
                .with_stagnation_limit(0)
                .with_seed(42),
        );
        let cancel = Arc::new(AtomicBool::new(true));

        let result = MkpRunner::run_with_cancel(&inst, &config, Some(cancel)).unwrap();
        assert_eq!(result.termination, Termination::Cancelled);
        assert_eq!(result.generations, 0);
        assert!(inst.is_feasible(&result.best.genes));
    }

    #[test]
    fn test_cancellation_from_another_thread() {
        let inst = random_instance(100, 5, 9);
        let config = serial(
            MkpConfig::default()
                .with_max_generations(usize::MAX)
                .with_stagnation_limit(0)
                .with_seed(9),
        );
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            cancel_clone.store(true, Ordering::Relaxed);
        });

        let result = MkpRunner::run_with_cancel(&inst, &config, Some(cancel)).unwrap();
        assert_eq!(result.termination, Termination::Cancelled);
    }

    #[test]
    fn test_invalid_config_fails_before_work() {
        let inst = example();
        let config = MkpConfig::default().with_population_size(0);
        assert!(matches!(
            MkpRunner::run(&inst, &config),
            Err(MkpError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_single_individual_population() {
        let inst = example();
        let config = serial(MkpConfig::default().with_population_size(1).with_seed(1));
        let result = MkpRunner::run(&inst, &config).unwrap();

        assert!(inst.is_feasible(&result.best.genes));
        assert_eq!(result.best_fitness, inst.total_profit(&result.best.genes));
        // Every maximal selection of the example earns at least 16.
        assert!(result.best_fitness >= 16);
        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0]);
        }

        // Without elitism the single slot is rebuilt every generation.
        let config = serial(
            MkpConfig::default()
                .with_population_size(1)
                .with_elite_count(0)
                .with_max_generations(20)
                .with_seed(1),
        );
        let mut evolution = Evolution::new(&inst, &config).unwrap();
        while !evolution.is_terminated() {
            evolution.step().unwrap();
            let pop = evolution.population().unwrap();
            assert_eq!(pop.len(), 1);
            assert!(inst.is_feasible(&pop.best().genes));
        }
    }

    #[test]
    fn test_into_result_before_initialization() {
        let inst = example();
        let evolution = Evolution::new(&inst, &MkpConfig::default().with_seed(1)).unwrap();
        assert!(matches!(
            evolution.into_result(),
            Err(MkpError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let inst = random_instance(80, 5, 13);
        let config = serial(
            MkpConfig::default()
                .with_population_size(30)
                .with_max_generations(40)
                .with_seed(13),
        );
        let a = MkpRunner::run(&inst, &config).unwrap();
        let b = MkpRunner::run(&inst, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.seed, 13);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let inst = random_instance(80, 5, 17);
        let config = MkpConfig::default()
            .with_population_size(40)
            .with_max_generations(30)
            .with_seed(17);

        let par = MkpRunner::run(&inst, &config.clone().with_parallel(true)).unwrap();
        let seq = MkpRunner::run(&inst, &config.with_parallel(false)).unwrap();
        assert_eq!(par.best, seq.best);
        assert_eq!(par.fitness_history, seq.fitness_history);
    }

    #[test]
    fn test_greedy_seed_is_never_worse_than_greedy() {
        let inst = random_instance(100, 5, 23);
        let repairer = Repairer::new(&inst, crate::EfficiencyMetric::SurrogateRatio);
        let greedy = inst.total_profit(&surrogate_greedy(&inst, &repairer));

        let config = serial(
            MkpConfig::default()
                .with_population_size(20)
                .with_max_generations(1)
                .with_greedy_seed(true)
                .with_seed(23),
        );
        let mut evolution = Evolution::new(&inst, &config).unwrap();
        evolution.step().unwrap();
        assert!(evolution.best().unwrap().fitness >= greedy);
    }

    #[test]
    fn test_preserve_elites_replaces_worst() {
        let make = |genes: Vec<bool>, fitness| Individual {
            genes,
            fitness,
            feasible: true,
        };
        let previous = Population::new(vec![
            make(vec![true, true], 9),
            make(vec![false, true], 4),
        ]);
        let mut offspring = vec![
            make(vec![true, false], 5),
            make(vec![false, false], 0),
            make(vec![false, true], 4),
        ];
        preserve_elites(&previous, &mut offspring, 1);
        assert_eq!(offspring[1].genes, vec![true, true]);

        // Already present: nothing is replaced.
        let before = offspring.clone();
        preserve_elites(&previous, &mut offspring, 2);
        assert_eq!(offspring, before);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_run_is_feasible_and_deterministic(
            n in 1usize..25,
            m in 1usize..4,
            instance_seed in any::<u64>(),
            run_seed in any::<u64>(),
        ) {
            let inst = random_instance(n, m, instance_seed);
            let config = serial(
                MkpConfig::default()
                    .with_population_size(8)
                    .with_max_generations(10)
                    .with_seed(run_seed),
            );
            let a = MkpRunner::run(&inst, &config).unwrap();
            let b = MkpRunner::run(&inst, &config).unwrap();

            prop_assert!(inst.is_feasible(&a.best.genes));
            prop_assert_eq!(a.best_fitness, inst.total_profit(&a.best.genes));
            prop_assert_eq!(&a.best, &b.best);
            for window in a.fitness_history.windows(2) {
                prop_assert!(window[1] >= window[0]);
            }
        }

        #[test]
        fn prop_every_individual_feasible(
            n in 1usize..30,
            m in 1usize..5,
            pop_size in 1usize..12,
            instance_seed in any::<u64>(),
            run_seed in any::<u64>(),
        ) {
            let inst = random_instance(n, m, instance_seed);
            let config = serial(
                MkpConfig::default()
                    .with_population_size(pop_size)
                    .with_elite_count(1)
                    .with_max_generations(8)
                    .with_mutation_probability(0.3)
                    .with_seed(run_seed),
            );
            let mut evolution = Evolution::new(&inst, &config).unwrap();
            while !evolution.is_terminated() {
                evolution.step().unwrap();
                let pop = evolution.population().unwrap();
                prop_assert_eq!(pop.len(), pop_size);
                for ind in pop.individuals() {
                    prop_assert!(ind.feasible);
                    prop_assert!(inst.is_feasible(&ind.genes));
                    prop_assert_eq!(ind.fitness, inst.total_profit(&ind.genes));
                }
            }
        }

        #[test]
        fn prop_oversized_item_never_selected(
            n in 2usize..20,
            m in 1usize..4,
            oversized in any::<prop::sample::Index>(),
            resource in any::<prop::sample::Index>(),
            instance_seed in any::<u64>(),
            run_seed in any::<u64>(),
        ) {
            let base = random_instance(n, m, instance_seed);
            let j = oversized.index(n);
            let i = resource.index(m);
            let mut data = InstanceData::from(base);
            // The richest item alone overloads one resource.
            data.profits[j] = 10_000;
            data.consumption[i][j] = data.capacities[i] + 1;
            let inst = Instance::from_data(data).unwrap();

            let config = serial(
                MkpConfig::default()
                    .with_population_size(10)
                    .with_max_generations(10)
                    .with_mutation_probability(0.5)
                    .with_initial_density(0.9)
                    .with_seed(run_seed),
            );
            let mut evolution = Evolution::new(&inst, &config).unwrap();
            while !evolution.is_terminated() {
                evolution.step().unwrap();
                let pop = evolution.population().unwrap();
                prop_assert!(pop.individuals().iter().all(|ind| !ind.genes[j]));
            }
        }
    }
}
