use thiserror::Error;

use crate::domain::ValidationError;
use crate::mdp::ContractError;

/// Top-level error for the solve pipeline: validation of the input goal
/// hierarchy, contract violations while walking the MDP, or numerical
/// failure inside a solver.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("policy iteration's linear system was singular evaluating iteration {iteration}")]
    SingularSystem { iteration: usize },
}
