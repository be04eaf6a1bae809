//! Policy iteration: exact evaluation + greedy improvement to a fixed point.
//!
//! Each iteration solves `(I - gamma * P_pi) V = R_pi` exactly (restricted
//! to non-terminal states; terminal states are pinned at value zero) and
//! then re-extracts a greedy policy. Iterates until the policy stops
//! changing — finite, since both the state and action spaces are finite,
//! so no artificial iteration cap is applied.

use std::collections::HashMap;

use super::error::SolveError;
use super::linalg::solve_in_place;
use crate::mdp::{Mdp, StateKey};

/// Solves `mdp` in place via policy iteration. Returns the number of
/// improvement iterations performed.
pub fn solve(mdp: &mut Mdp) -> Result<usize, SolveError> {
    let states: Vec<StateKey> = mdp.states().to_vec();
    let non_terminal: Vec<usize> = (0..states.len())
        .filter(|&i| !mdp.is_terminal(&states[i]))
        .collect();
    let row_of: HashMap<usize, usize> = non_terminal
        .iter()
        .enumerate()
        .map(|(row, &state_idx)| (state_idx, row))
        .collect();
    let m = non_terminal.len();

    if m == 0 {
        // Every state is terminal (e.g. an empty to-do list); nothing to
        // iterate.
        return Ok(0);
    }

    // Initial policy: the smallest-index legal action in every
    // non-terminal state.
    let mut policy: Vec<Option<usize>> = states
        .iter()
        .map(|s| mdp.possible_actions(s).into_iter().next())
        .collect();

    let mut iteration = 0usize;
    loop {
        iteration += 1;

        // --- Evaluation: solve (I - gamma P_pi) V = R_pi exactly. ---
        let mut a = vec![vec![0.0; m]; m];
        let mut b = vec![0.0; m];
        for row in 0..m {
            a[row][row] = 1.0;
        }

        for (row, &state_idx) in non_terminal.iter().enumerate() {
            let s = states[state_idx];
            let action = policy[state_idx].expect("non-terminal state has a legal action");
            for (s2, p) in mdp.trans_states_and_probs(&s, action)?.into_iter() {
                let r = mdp.reward(&s, action, &s2);
                b[row] += p * r;
                // A successor with no row is terminal (value pinned at
                // zero), so it contributes nothing to the A matrix.
                if let Some(&i2) = mdp.index_of(&s2).and_then(|state_idx2| row_of.get(&state_idx2))
                {
                    a[row][i2] -= mdp.gamma() * p;
                }
            }
        }

        let x = solve_in_place(&mut a, &mut b)
            .ok_or(SolveError::SingularSystem { iteration })?;

        for (row, &state_idx) in non_terminal.iter().enumerate() {
            mdp.set_value(
                state_idx,
                crate::mdp::ValueEntry {
                    value: x[row],
                    action: policy[state_idx],
                },
            );
        }

        // --- Improvement: greedy w.r.t. the value just computed. ---
        let mut changed = false;
        let mut new_policy = policy.clone();
        for &state_idx in &non_terminal {
            let s = states[state_idx];
            let entry = mdp.value_and_action(&s);
            if entry.action != policy[state_idx] {
                changed = true;
            }
            new_policy[state_idx] = entry.action;
        }

        policy = new_policy;
        if !changed {
            break;
        }
    }

    Ok(iteration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Goal, Task};
    use crate::solvers::backward_induction;
    use crate::todo_list::ToDoList;
    use std::collections::BTreeMap;

    fn two_goal_todo() -> ToDoList {
        let mk = |desc: &str| Task::certain(desc, 1).unwrap();
        let rewards = |pairs: &[(u32, f64)]| -> BTreeMap<u32, f64> { pairs.iter().copied().collect() };

        let a = Goal::new("A", "A", vec![mk("A1")], rewards(&[(10, 100.0)]), -10.0, 0).unwrap();
        let c = Goal::new(
            "C",
            "C",
            vec![mk("C1"), mk("C2")],
            rewards(&[(1, 10.0), (6, 100.0)]),
            -1.0,
            0,
        )
        .unwrap();
        ToDoList::new(vec![a, c], 0, vec![])
    }

    #[test]
    fn matches_backward_induction_on_deterministic_instance() {
        let todo = two_goal_todo();

        let mut bi = Mdp::new(&todo, 1.0);
        backward_induction::solve(&mut bi);

        let mut pi = Mdp::new(&todo, 1.0);
        solve(&mut pi).unwrap();

        let v_bi = bi.value_and_action(&bi.start_state()).value;
        let v_pi = pi.value_and_action(&pi.start_state()).value;
        assert!((v_bi - v_pi).abs() < 1e-9);
    }

    #[test]
    fn converges_on_single_task_goal() {
        let task = Task::certain("only", 1).unwrap();
        let rewards: BTreeMap<u32, f64> = [(1, 100.0)].into_iter().collect();
        let goal = Goal::new("g", "G", vec![task], rewards, 0.0, 0).unwrap();
        let todo = ToDoList::new(vec![goal], 0, vec![]);

        let mut mdp = Mdp::new(&todo, 1.0);
        solve(&mut mdp).unwrap();
        assert_eq!(mdp.value_and_action(&mdp.start_state()).value, 100.0);
    }
}
