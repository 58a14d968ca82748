//! Binary-string variation operators.
//!
//! All operators work on raw gene vectors and may produce infeasible
//! selections; the controller repairs offspring afterwards.
//!
//! # Crossover Operators
//!
//! - [`uniform_crossover`]: Syswerda (1989) — each gene from either parent
//!   with probability 0.5
//!
//! # Mutation Operators
//!
//! - [`bit_flip_mutation`]: flip each gene independently with probability `p`
//!
//! # References
//!
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
//! - Chu & Beasley (1998), "A Genetic Algorithm for the Multidimensional
//!   Knapsack Problem"

use rand::Rng;

/// Random gene vector where each gene is `true` with probability `density`.
///
/// # Panics
/// Panics if `density` is outside `[0, 1]`.
pub fn random_genes<R: Rng>(n: usize, density: f64, rng: &mut R) -> Vec<bool> {
    (0..n).map(|_| rng.random_bool(density)).collect()
}

/// Uniform crossover.
///
/// For each position a fair coin decides whether child 1 takes the gene of
/// parent 1 (and child 2 that of parent 2) or the other way round, so the
/// two children are complementary.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths.
pub fn uniform_crossover<R: Rng>(
    parent1: &[bool],
    parent2: &[bool],
    rng: &mut R,
) -> (Vec<bool>, Vec<bool>) {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );

    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent1.len());
    for (&a, &b) in parent1.iter().zip(parent2) {
        if rng.random_bool(0.5) {
            child1.push(a);
            child2.push(b);
        } else {
            child1.push(b);
            child2.push(a);
        }
    }
    (child1, child2)
}

/// Bit-flip mutation: flips each gene independently with probability `p`.
///
/// Returns the number of flipped genes.
///
/// # Panics
/// Panics if `p` is outside `[0, 1]`.
pub fn bit_flip_mutation<R: Rng>(genes: &mut [bool], p: f64, rng: &mut R) -> usize {
    let mut flipped = 0;
    for gene in genes.iter_mut() {
        if rng.random_bool(p) {
            *gene = !*gene;
            flipped += 1;
        }
    }
    flipped
}
