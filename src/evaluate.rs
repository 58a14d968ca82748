//! Fitness evaluation.

use crate::error::{MkpError, Result};
use crate::ga::Individual;
use crate::instance::Instance;

/// Returns the total profit of a repaired individual.
///
/// # Errors
///
/// Returns [`MkpError::InternalInvariantViolation`] when the individual is
/// not flagged feasible or its gene count does not match the instance; both
/// mean it skipped repair.
pub fn evaluate(instance: &Instance, individual: &Individual) -> Result<u64> {
    if individual.genes.len() != instance.n_items() {
        return Err(MkpError::InternalInvariantViolation(format!(
            "individual has {} genes, instance has {} items",
            individual.genes.len(),
            instance.n_items()
        )));
    }
    if !individual.feasible {
        return Err(MkpError::InternalInvariantViolation(
            "infeasible individual reached the evaluator".into(),
        ));
    }
    debug_assert!(instance.is_feasible(&individual.genes));
    Ok(instance.total_profit(&individual.genes))
}
