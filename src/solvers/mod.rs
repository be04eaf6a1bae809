//! Solvers for the [`Mdp`](crate::mdp::Mdp): three interchangeable ways to
//! populate its value table and optimal policy, all producing the same
//! answer on a deterministic instance (§8 Scenario F).

pub mod backward_induction;
mod error;
mod linalg;
pub mod policy_iteration;
pub mod value_iteration;

pub use error::SolveError;

use crate::config::SolverConfig;
use crate::mdp::{ContractError, Mdp};

/// Identifies which of the three solvers to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    /// A single reverse-topological sweep. The cheapest choice and the one
    /// this crate defaults to — the MDP is always a DAG (§8 invariant 1).
    #[default]
    BackwardInduction,
    /// Exact policy evaluation via a dense linear solve, alternating with
    /// greedy improvement to a fixed point.
    PolicyIteration,
    /// Synchronous (Jacobi) Bellman sweeps to ε-convergence.
    ValueIteration,
}

/// Solves `mdp` in place with the requested solver, using `config` for
/// any solver-specific parameters (currently only value iteration's
/// `epsilon`).
///
/// Fatal contract violation: `mdp`'s `ToDoList` has no tasks at all (§7:
/// "empty task list" is a contract error, distinct from an individual
/// *state* having no legal actions, which every solver already handles as
/// an ordinary terminal state).
pub fn solve(mdp: &mut Mdp, kind: SolverKind, config: &SolverConfig) -> Result<(), SolveError> {
    if mdp.todo_list().is_empty() {
        return Err(SolveError::Contract(ContractError::EmptyToDoList));
    }

    match kind {
        SolverKind::BackwardInduction => {
            backward_induction::solve(mdp);
        }
        SolverKind::PolicyIteration => {
            policy_iteration::solve(mdp)?;
        }
        SolverKind::ValueIteration => {
            value_iteration::solve(mdp, config.epsilon());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Goal, Task};
    use crate::todo_list::ToDoList;
    use std::collections::BTreeMap;

    fn single_task_goal() -> ToDoList {
        let task = Task::certain("only", 1).unwrap();
        let rewards: BTreeMap<u32, f64> = [(1, 100.0)].into_iter().collect();
        let goal = Goal::new("g", "G", vec![task], rewards, 0.0, 0).unwrap();
        ToDoList::new(vec![goal], 0, vec![])
    }

    #[test]
    fn all_three_kinds_agree_on_a_simple_instance() {
        let todo = single_task_goal();
        let config = SolverConfig::default();

        for kind in [
            SolverKind::BackwardInduction,
            SolverKind::PolicyIteration,
            SolverKind::ValueIteration,
        ] {
            let mut mdp = Mdp::new(&todo, 1.0);
            solve(&mut mdp, kind, &config).unwrap();
            let v = mdp.value_and_action(&mdp.start_state()).value;
            assert!((v - 100.0).abs() < 0.1, "{kind:?} produced {v}");
        }
    }

    #[test]
    fn rejects_an_empty_todo_list() {
        let todo = ToDoList::new(vec![], 0, vec![]);
        let config = SolverConfig::default();
        let mut mdp = Mdp::new(&todo, 1.0);

        let err = solve(&mut mdp, SolverKind::BackwardInduction, &config).unwrap_err();
        assert!(matches!(
            err,
            SolveError::Contract(ContractError::EmptyToDoList)
        ));
    }
}
