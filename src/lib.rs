//! Approximate solver for the 0/1 multidimensional knapsack problem (MKP).
//!
//! Given N items with integer profits and M resources with integer
//! capacities, pick the subset of items with the largest total profit
//! such that no resource is overloaded. The problem is NP-hard; this crate
//! trades optimality for a bounded computation budget:
//!
//! - **Repair**: greedy removal of the least efficient items turns any bit
//!   vector into a feasible selection.
//! - **Local search**: greedy re-insertion of the most efficient items that
//!   still fit closes leftover slack.
//! - **Genetic algorithm**: tournament selection, uniform crossover and
//!   bit-flip mutation with elitism, stopped by a generation limit,
//!   stagnation, a time budget or external cancellation.
//! - **Constructive heuristics**: surrogate-relaxation greedy and
//!   random-order greedy.
//!
//! # Example
//!
//! ```
//! use u_mkp::{Instance, MkpConfig, MkpRunner};
//!
//! let instance = Instance::new(
//!     vec![10, 6, 8, 4],
//!     vec![10],
//!     vec![vec![5, 4, 3, 2]],
//! )?;
//! let config = MkpConfig::default().with_seed(42);
//! let result = MkpRunner::run(&instance, &config)?;
//! let solution = result.solution(&instance);
//! assert_eq!(solution.profit, 22);
//! assert_eq!(solution.selected, vec![0, 2, 3]);
//! # Ok::<(), u_mkp::MkpError>(())
//! ```
//!
//! # Architecture
//!
//! Instance loading, command-line handling and reporting are left to
//! callers. The crate logs through `tracing` and never installs a
//! subscriber.

pub mod construct;
pub mod efficiency;
pub mod error;
pub mod evaluate;
pub mod ga;
pub mod instance;
pub mod local_search;
pub mod random;
pub mod repair;
pub mod solution;
pub mod usage;

pub use efficiency::{Efficiency, EfficiencyMetric};
pub use error::{MkpError, Result};
pub use ga::{
    Evolution, Individual, MkpConfig, MkpResult, MkpRunner, Phase, Population, Termination,
};
pub use instance::{Instance, InstanceData};
pub use repair::{Repaired, Repairer};
pub use solution::{MkpSolution, ResourceReport};
pub use usage::ResourceUsage;
