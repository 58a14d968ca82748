//! Seeded random sources.
//!
//! The solver never touches a thread-local or global generator: a single
//! [`SolverRng`] is created from the configured seed and threaded through
//! every randomized operator.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random generator used by all operators.
pub type SolverRng = StdRng;

/// Creates a generator from a 64-bit seed.
///
/// Two generators built from the same seed produce identical streams.
pub fn create_rng(seed: u64) -> SolverRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from the configured seed, or from OS entropy when
/// no seed is given. Returns the seed actually used so it can be logged.
pub fn rng_for(seed: Option<u64>) -> (SolverRng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (create_rng(seed), seed)
}
