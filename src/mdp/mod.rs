//! The Markov Decision Process built on top of a [`ToDoList`].
//!
//! # State encoding and the failure-semantics open question
//!
//! A state is the pair `(completion_vector, elapsed_time)`. Because every
//! transition resolves exactly one task (success or failure) and elapsed
//! time only ever depends on *which* tasks have been resolved — never the
//! order — elapsed time is fully determined by the completion vector, so
//! states only differ in practice by `done` and one auxiliary bitmask,
//! `doomed` (see [`state::StateKey`]).
//!
//! `doomed` resolves an ambiguity the source left unspecified: when a
//! probabilistic task fails, does its goal's penalty get collected
//! immediately, and are the goal's remaining tasks then "free"? This crate
//! answers yes to both: the first failed task in a goal credits that
//! goal's penalty exactly once (setting the goal's `doomed` bit), and every
//! later success or failure within that goal earns zero, forever. This
//! keeps the chain Markov without a second bit per task. On deterministic
//! instances (every task has probability 1, which is every scenario this
//! crate is tested against) `doomed` never becomes nonzero and the state
//! reduces exactly to the bare `(completion_vector, elapsed_time)` pair.
//!
//! # Terminal states
//!
//! A state is terminal iff every task is resolved (`done` has all `N` bits
//! set). The design sketches a second, "pseudo-terminal" condition — stop
//! early once every remaining action can only ever be worth zero — as an
//! optimization. It is not needed for correctness: a doomed goal's
//! remaining tasks are worth exactly zero wherever in the trajectory they
//! are scheduled, so by linearity of expectation deferring them to the end
//! changes nothing about the optimal value. This crate therefore always
//! runs states out to the literal all-bits-set terminal, which keeps
//! `is_terminal` and `get_possible_actions` trivially consistent (§8
//! invariant 2: a state is terminal iff it has no legal actions).

mod error;
mod state;

pub use error::ContractError;
pub use state::{topo_cmp, StateKey, ValueEntry};

use std::collections::HashMap;

use crate::reward_scaling::RewardScaler;
use crate::todo_list::ToDoList;

/// The Markov Decision Process over a [`ToDoList`]'s tasks.
///
/// Owns the reachable state set and the value/policy tables a solver
/// populates. Borrows its `ToDoList` immutably for its whole lifetime —
/// the to-do list is shared read-only infrastructure, never mutated by a
/// solve (§9: "the ToDoList is shared by reference (immutable)").
#[derive(Debug)]
pub struct Mdp<'a> {
    todo: &'a ToDoList,
    gamma: f64,
    states: Vec<StateKey>,
    state_index: HashMap<StateKey, usize>,
    values: Vec<ValueEntry>,
    scaler: Option<RewardScaler>,
}

impl<'a> Mdp<'a> {
    /// Builds the MDP's reachable state set (forward reachability from the
    /// start state, discovered once and then sorted into the topological
    /// order backward induction needs). `gamma` is the discount factor,
    /// `(0, 1]`.
    pub fn new(todo: &'a ToDoList, gamma: f64) -> Self {
        let mut states = Self::discover_reachable_states(todo);
        states.sort_by(topo_cmp);

        let state_index: HashMap<StateKey, usize> = states
            .iter()
            .enumerate()
            .map(|(i, s)| (*s, i))
            .collect();
        let values = vec![ValueEntry::terminal(); states.len()];

        Self {
            todo,
            gamma,
            states,
            state_index,
            values,
            scaler: None,
        }
    }

    fn discover_reachable_states(todo: &ToDoList) -> Vec<StateKey> {
        let start = StateKey::new(0, 0, todo.start_time());
        let mut visited = HashMap::new();
        visited.insert(start, ());
        let mut frontier = vec![start];

        while let Some(s) = frontier.pop() {
            if s.popcount() as usize == todo.len() {
                continue;
            }
            for a in 0..todo.len() {
                if s.is_done(a) {
                    continue;
                }
                for (s2, _, _) in Self::raw_transitions(todo, &s, a) {
                    if visited.insert(s2, ()).is_none() {
                        frontier.push(s2);
                    }
                }
            }
        }

        visited.into_keys().collect()
    }

    /// Transition outcomes for attempting task `a` from `s`, computed
    /// without validating legality (used internally by both state
    /// discovery and the public, validated transition API).
    fn raw_transitions(todo: &ToDoList, s: &StateKey, a: usize) -> Vec<(StateKey, f64, f64)> {
        let task = todo.task(a);
        let new_done = s.done | (1 << a);
        let new_t = s.t + task.time_est();

        match todo.owning_goal(a) {
            None => {
                // A standalone task has no goal to complete or doom: its
                // success and failure branches land on the same state and
                // both pay zero, so they collapse into one outcome.
                vec![(StateKey::new(new_done, s.doomed, new_t), 1.0, 0.0)]
            }
            Some(g) => {
                let goal = todo.goal(g);
                let p = task.prob();
                let mut out = Vec::with_capacity(2);

                let success_state = StateKey::new(new_done, s.doomed, new_t);
                let completes_goal = !s.is_doomed(g)
                    && todo
                        .goal_indices(g)
                        .iter()
                        .all(|&i| success_state.is_done(i));
                let success_reward = if completes_goal {
                    goal.get_reward(new_t)
                } else {
                    0.0
                };
                out.push((success_state, p, success_reward));

                if p < 1.0 {
                    let fail_state = StateKey::new(new_done, s.doomed | (1 << g), new_t);
                    let fail_reward = if s.is_doomed(g) { 0.0 } else { goal.penalty() };
                    out.push((fail_state, 1.0 - p, fail_reward));
                }

                out
            }
        }
    }

    fn check_legal(&self, s: &StateKey, a: usize) -> Result<(), ContractError> {
        if a >= self.todo.len() {
            return Err(ContractError::ActionOutOfRange {
                action: a,
                len: self.todo.len(),
            });
        }
        if s.is_done(a) {
            return Err(ContractError::IllegalAction {
                action: a,
                state: *s,
            });
        }
        Ok(())
    }

    /// All reachable states, in topological order (ascending completion
    /// count, ties broken by elapsed time).
    pub fn states(&self) -> &[StateKey] {
        &self.states
    }

    pub fn start_state(&self) -> StateKey {
        StateKey::new(0, 0, self.todo.start_time())
    }

    pub fn todo_list(&self) -> &ToDoList {
        self.todo
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// A state is terminal iff every task has been resolved. Equivalent to
    /// `get_possible_actions(s).is_empty()` by construction (§8 invariant
    /// 2).
    pub fn is_terminal(&self, s: &StateKey) -> bool {
        s.popcount() as usize == self.todo.len()
    }

    /// Legal actions in `s`: every task not yet resolved.
    pub fn possible_actions(&self, s: &StateKey) -> Vec<usize> {
        if self.is_terminal(s) {
            return Vec::new();
        }
        (0..self.todo.len()).filter(|&i| !s.is_done(i)).collect()
    }

    /// Transition outcomes `(s', P(s'|s,a))` for legal action `a`.
    pub fn trans_states_and_probs(
        &self,
        s: &StateKey,
        a: usize,
    ) -> Result<Vec<(StateKey, f64)>, ContractError> {
        self.check_legal(s, a)?;
        Ok(Self::raw_transitions(self.todo, s, a)
            .into_iter()
            .map(|(s2, p, _)| (s2, p))
            .collect())
    }

    /// Reward earned transitioning `s --a--> s'`. Zero if `s'` is not a
    /// reachable outcome of `(s, a)`.
    pub fn reward(&self, s: &StateKey, a: usize, s_next: &StateKey) -> f64 {
        Self::raw_transitions(self.todo, s, a)
            .into_iter()
            .find(|(s2, _, _)| s2 == s_next)
            .map(|(_, _, r)| r)
            .unwrap_or(0.0)
    }

    /// `Q(s, a)` under an arbitrary value lookup — the hook solvers use to
    /// evaluate against a previous iterate's value function rather than
    /// the MDP's own (possibly not-yet-solved) table.
    pub fn q_value_with(
        &self,
        s: &StateKey,
        a: usize,
        value_of: impl Fn(&StateKey) -> f64,
    ) -> Result<f64, ContractError> {
        self.check_legal(s, a)?;
        Ok(Self::raw_transitions(self.todo, s, a)
            .into_iter()
            .map(|(s2, p, r)| p * (r + self.gamma * value_of(&s2)))
            .sum())
    }

    /// `Q(s, a)` under this MDP's own, already-solved value table.
    pub fn q_value(&self, s: &StateKey, a: usize) -> Result<f64, ContractError> {
        self.q_value_with(s, a, |s2| self.value_at(s2))
    }

    /// The Bellman optimality step: `max_a Q(s, a)`, ties broken by
    /// smallest action index, under an arbitrary value lookup.
    pub fn value_and_action_with(
        &self,
        s: &StateKey,
        value_of: impl Fn(&StateKey) -> f64,
    ) -> ValueEntry {
        if self.is_terminal(s) {
            return ValueEntry::terminal();
        }

        let mut best_value = f64::NEG_INFINITY;
        let mut best_action = None;
        for a in self.possible_actions(s) {
            let q = self
                .q_value_with(s, a, &value_of)
                .expect("possible_actions only yields legal actions");
            if q > best_value {
                best_value = q;
                best_action = Some(a);
            }
        }

        ValueEntry {
            value: best_value,
            action: best_action,
        }
    }

    /// The Bellman optimality step against this MDP's own value table.
    pub fn value_and_action(&self, s: &StateKey) -> ValueEntry {
        self.value_and_action_with(s, |s2| self.value_at(s2))
    }

    /// The value of `s` under whatever has been solved so far (zero for
    /// unknown states, matching an unsolved terminal default).
    pub fn value_at(&self, s: &StateKey) -> f64 {
        self.state_index
            .get(s)
            .map(|&i| self.values[i].value)
            .unwrap_or(0.0)
    }

    pub fn action_at(&self, s: &StateKey) -> Option<usize> {
        self.state_index.get(s).and_then(|&i| self.values[i].action)
    }

    pub fn index_of(&self, s: &StateKey) -> Option<usize> {
        self.state_index.get(s).copied()
    }

    /// Direct access to the value table, parallel to [`Mdp::states`], for
    /// solvers to populate.
    pub fn values_mut(&mut self) -> &mut [ValueEntry] {
        &mut self.values
    }

    pub fn set_value(&mut self, idx: usize, entry: ValueEntry) {
        self.values[idx] = entry;
    }

    /// `V`: `(state, value)` for every reachable state.
    pub fn value_function(&self) -> impl Iterator<Item = (&StateKey, f64)> {
        self.states.iter().zip(self.values.iter().map(|v| v.value))
    }

    /// `π*`: `(state, action)` for every non-terminal reachable state.
    pub fn optimal_policy(&self) -> impl Iterator<Item = (&StateKey, usize)> {
        self.states
            .iter()
            .zip(self.values.iter())
            .filter_map(|(s, v)| v.action.map(|a| (s, a)))
    }

    /// The pseudo-reward `Q(s, a) - V(s)`, optionally passed through the
    /// display-only affine scaling installed by
    /// [`Mdp::install_reward_scaling`].
    pub fn expected_pseudo_rewards(
        &self,
        s: &StateKey,
        a: usize,
        transformed: bool,
    ) -> Result<f64, ContractError> {
        let pr = self.q_value(s, a)? - self.value_at(s);
        Ok(if transformed {
            self.scaler.as_ref().map(|sc| sc.apply(pr)).unwrap_or(pr)
        } else {
            pr
        })
    }

    /// Computes the pseudo-reward of every legal `(s, a)` pair in the
    /// solved MDP and installs an affine scaler mapping them into
    /// `[floor, ceil]`. Display-only; never consulted by a solver.
    pub fn install_reward_scaling(&mut self, floor: f64, ceil: f64) {
        let mut prs = Vec::new();
        for s in self.states.clone() {
            for a in self.possible_actions(&s) {
                if let Ok(pr) = self.q_value(&s, a) {
                    prs.push(pr - self.value_at(&s));
                }
            }
        }
        self.scaler = Some(RewardScaler::fit(&prs, floor, ceil));
    }
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
    fn start_state_is_terminal_for_empty_todo_list() {
        let todo = ToDoList::new(vec![], 0, vec![]);
        let mdp = Mdp::new(&todo, 1.0);
        assert!(mdp.is_terminal(&mdp.start_state()));
        assert_eq!(mdp.value_and_action(&mdp.start_state()).value, 0.0);
    }

    #[test]
    fn single_task_single_goal_value_matches_reward() {
        let todo = single_task_goal();
        let mut mdp = Mdp::new(&todo, 1.0);
        crate::solvers::backward_induction::solve(&mut mdp);

        let v = mdp.value_and_action(&mdp.start_state());
        assert_eq!(v.value, 100.0);
        assert_eq!(v.action, Some(0));
    }

    #[test]
    fn illegal_action_is_a_contract_error() {
        let todo = single_task_goal();
        let mdp = Mdp::new(&todo, 1.0);
        let done_state = StateKey::new(1, 0, 1);
        let err = mdp.trans_states_and_probs(&done_state, 0).unwrap_err();
        assert!(matches!(err, ContractError::IllegalAction { .. }));
    }

    #[test]
    fn transitions_strictly_increase_popcount_and_time() {
        let todo = single_task_goal();
        let mdp = Mdp::new(&todo, 1.0);
        let s = mdp.start_state();
        for a in mdp.possible_actions(&s) {
            for (s2, _) in mdp.trans_states_and_probs(&s, a).unwrap() {
                assert!(s2.popcount() > s.popcount());
                assert!(s2.t >= s.t);
            }
        }
    }

    #[test]
    fn is_terminal_matches_empty_possible_actions() {
        let todo = single_task_goal();
        let mdp = Mdp::new(&todo, 1.0);
        for s in mdp.states() {
            assert_eq!(mdp.is_terminal(s), mdp.possible_actions(s).is_empty());
        }
    }

    #[test]
    fn probabilistic_failure_credits_penalty_once() {
        // CS HW: two tasks p=0.9,0.8 est 1,2, reward {5:10}, penalty -10.
        let t1 = Task::new("hw1", 1, 0.9, false).unwrap();
        let t2 = Task::new("hw2", 2, 0.8, false).unwrap();
        let rewards: BTreeMap<u32, f64> = [(5, 10.0)].into_iter().collect();
        let goal = Goal::new("cs", "CS", vec![t1, t2], rewards, -10.0, 0).unwrap();
        let todo = ToDoList::new(vec![goal], 0, vec![]);
        let mut mdp = Mdp::new(&todo, 1.0);
        crate::solvers::backward_induction::solve(&mut mdp);

        let v = mdp.value_and_action(&mdp.start_state()).value;
        let expected = 0.9 * 0.8 * 10.0 + (1.0 - 0.9 * 0.8) * (-10.0);
        assert!((v - expected).abs() < 1e-9, "got {v}, expected {expected}");
    }
}
