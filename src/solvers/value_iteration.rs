//! Value iteration: synchronous (Jacobi) Bellman sweeps to ε-convergence.
//!
//! Every sweep computes `V_{k+1}` entirely from `V_k` — never from values
//! already updated earlier in the same sweep — and the two buffers are
//! swapped only once the whole sweep is done. This ordering guarantee
//! (Jacobi, not Gauss–Seidel) is load-bearing: it's what keeps the
//! convergence path, and therefore the iteration count, reproducible.

use crate::mdp::{Mdp, StateKey, ValueEntry};

/// Default convergence threshold on the maximum per-state value change
/// between sweeps.
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Solves `mdp` in place via value iteration with the given convergence
/// threshold. Returns the number of sweeps performed.
pub fn solve(mdp: &mut Mdp, epsilon: f64) -> usize {
    let states: Vec<StateKey> = mdp.states().to_vec();
    let mut v = vec![0.0_f64; states.len()];
    let mut iterations = 0usize;

    loop {
        iterations += 1;
        let mut v_next = vec![0.0_f64; states.len()];
        let mut max_delta = 0.0_f64;

        for (i, s) in states.iter().enumerate() {
            let entry = mdp.value_and_action_with(s, |s2| {
                mdp.index_of(s2).map(|j| v[j]).unwrap_or(0.0)
            });
            max_delta = max_delta.max((entry.value - v[i]).abs());
            v_next[i] = entry.value;
        }

        v = v_next;
        if max_delta <= epsilon {
            break;
        }
    }

    // Extract the greedy policy against the converged value function.
    for (i, s) in states.iter().enumerate() {
        let entry = mdp.value_and_action_with(s, |s2| mdp.index_of(s2).map(|j| v[j]).unwrap_or(0.0));
        mdp.set_value(
            i,
            ValueEntry {
                value: v[i],
                action: entry.action,
            },
        );
    }

    iterations
}
