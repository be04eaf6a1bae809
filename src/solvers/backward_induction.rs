//! Backward induction: a single reverse-topological sweep.
//!
//! Every transition strictly increases a state's completion count (§8
//! invariant 1), so the MDP is a DAG and one pass — processing states with
//! the most tasks already resolved first — is enough to compute exact
//! values everywhere.

use crate::mdp::Mdp;

/// Solves `mdp` in place with a single backward sweep.
pub fn solve(mdp: &mut Mdp) {
    let states = mdp.states().to_vec();
    for (idx, s) in states.iter().enumerate().rev() {
        let entry = mdp.value_and_action(s);
        mdp.set_value(idx, entry);
    }
}
