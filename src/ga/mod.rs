//! Genetic algorithm for the multidimensional knapsack problem.
//!
//! Binary chromosomes, one gene per item. Every offspring goes through the
//! same pipeline before it joins the population:
//!
//! ```text
//! tournament → uniform crossover → bit-flip mutation → repair → fill → evaluate
//! ```
//!
//! so every individual in a population is feasible and locally maximal.
//!
//! # Key Types
//!
//! - [`MkpConfig`]: Algorithm parameters (population size, rates, presets)
//! - [`Evolution`]: Stepwise controller state machine
//! - [`MkpRunner`]: Drives an [`Evolution`] to termination
//! - [`MkpResult`]: Best solution and run statistics
//!
//! # Submodules
//!
//! - [`operators`]: Binary crossover, mutation and random initialization
//! - [`selection`]: Tournament selection
//!
//! # References
//!
//! - Chu & Beasley (1998), "A Genetic Algorithm for the Multidimensional
//!   Knapsack Problem"
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::MkpConfig;
pub use runner::{Evolution, MkpResult, MkpRunner, Phase, Termination};
pub use types::{Individual, Population};
