//! Packs a solved MDP's policy into a single day's schedule (§4.5).
//!
//! Two phases. First, any tasks the user pinned to today are taken in the
//! order given, on the assumption that each succeeds — this is bookkeeping
//! for the user's stated intent, not a recommendation, so it's allowed to
//! run the remaining time budget negative. Second, whatever time budget is
//! left is filled greedily by Q-value, highest first, skipping anything
//! that no longer fits.

use std::cmp::Ordering;

use crate::mdp::{ContractError, Mdp, StateKey};
use crate::reward_scaling::RewardScaler;

/// One task placed into the packed day.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedItem {
    /// The task's flattened index in the underlying `ToDoList`.
    pub index: usize,
    pub description: String,
    /// Display pseudo-reward, rounded and (if the MDP has scaling
    /// installed) rescaled.
    pub pseudo_reward: f64,
    /// Whether this item came from the pin phase rather than the greedy
    /// fill.
    pub pinned: bool,
}

/// Packs today's schedule: pins `today_tasks` (by description) first, then
/// greedily fills the remaining `time_budget` minutes by descending
/// Q-value.
pub fn pack_day(
    mdp: &Mdp,
    today_tasks: &[String],
    time_budget: i64,
    round_digits: u32,
) -> Result<Vec<PackedItem>, ContractError> {
    let todo = mdp.todo_list();
    let mut s = mdp.start_state();
    let mut remaining = time_budget;
    let mut out = Vec::new();

    for description in today_tasks {
        let idx = todo
            .index_of_description(description)
            .ok_or_else(|| ContractError::PinnedTaskNotFound(description.clone()))?;
        mdp.trans_states_and_probs(&s, idx)?;

        let pr = mdp.expected_pseudo_rewards(&s, idx, true)?;
        let task = todo.task(idx);
        remaining -= task.time_est() as i64;
        out.push(PackedItem {
            index: idx,
            description: task.description().to_string(),
            pseudo_reward: RewardScaler::round_to(pr, round_digits),
            pinned: true,
        });
        s = assume_success(&s, idx, task.time_est());
    }

    loop {
        let mut ranked: Vec<(usize, f64)> = mdp
            .possible_actions(&s)
            .into_iter()
            .map(|a| (a, mdp.q_value(&s, a).unwrap_or(f64::NEG_INFINITY)))
            .collect();
        if ranked.is_empty() {
            break;
        }
        ranked.sort_by(|(i1, q1), (i2, q2)| {
            q2.partial_cmp(q1).unwrap_or(Ordering::Equal).then(i1.cmp(i2))
        });

        let Some(&(a, _)) = ranked.iter().find(|(a, _)| {
            todo.task(*a).time_est() as i64 <= remaining
        }) else {
            break;
        };

        let pr = mdp.expected_pseudo_rewards(&s, a, true)?;
        let task = todo.task(a);
        remaining -= task.time_est() as i64;
        out.push(PackedItem {
            index: a,
            description: task.description().to_string(),
            pseudo_reward: RewardScaler::round_to(pr, round_digits),
            pinned: false,
        });
        s = assume_success(&s, a, task.time_est());
    }

    Ok(out)
}

/// The successor state assuming `a` succeeds, regardless of its actual
/// success probability — the pin phase's "assume success" bookkeeping rule.
fn assume_success(s: &StateKey, a: usize, time_est: u32) -> StateKey {
    StateKey::new(s.done | (1 << a), s.doomed, s.t + time_est)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Goal, Task};
    use crate::solvers::backward_induction;
    use crate::todo_list::ToDoList;
    use std::collections::BTreeMap;

    fn two_goal_todo() -> ToDoList {
        let mk = |desc: &str, t: u32| Task::certain(desc, t).unwrap();
        let rewards = |pairs: &[(u32, f64)]| -> BTreeMap<u32, f64> { pairs.iter().copied().collect() };

        let a = Goal::new(
            "A",
            "A",
            vec![mk("A1", 30), mk("A2", 30)],
            rewards(&[(100, 10.0)]),
            -1.0,
            0,
        )
        .unwrap();
        let b = Goal::new(
            "B",
            "B",
            vec![mk("B1", 20)],
            rewards(&[(100, 1000.0)]),
            -1.0,
            0,
        )
        .unwrap();
        ToDoList::new(vec![a, b], 0, vec![])
    }

    #[test]
    fn pin_phase_takes_named_tasks_first_even_if_low_value() {
        let todo = two_goal_todo();
        let mut mdp = Mdp::new(&todo, 1.0);
        backward_induction::solve(&mut mdp);

        let pinned = vec!["A1".to_string()];
        let packed = pack_day(&mdp, &pinned, 60, 2).unwrap();

        assert_eq!(packed[0].description, "A1");
        assert!(packed[0].pinned);
    }

    #[test]
    fn greedy_phase_prefers_the_higher_value_goal() {
        let todo = two_goal_todo();
        let mut mdp = Mdp::new(&todo, 1.0);
        backward_induction::solve(&mut mdp);

        let packed = pack_day(&mdp, &[], 20, 2).unwrap();
        assert_eq!(packed.len(), 1);
        assert_eq!(packed[0].description, "B1");
        assert!(!packed[0].pinned);
    }

    #[test]
    fn unknown_pinned_description_is_an_error() {
        let todo = two_goal_todo();
        let mut mdp = Mdp::new(&todo, 1.0);
        backward_induction::solve(&mut mdp);

        let err = pack_day(&mdp, &["nonexistent".to_string()], 60, 2).unwrap_err();
        assert!(matches!(err, ContractError::PinnedTaskNotFound(_)));
    }

    #[test]
    fn pin_phase_can_run_the_budget_negative() {
        let todo = two_goal_todo();
        let mut mdp = Mdp::new(&todo, 1.0);
        backward_induction::solve(&mut mdp);

        let pinned = vec!["A1".to_string(), "A2".to_string()];
        let packed = pack_day(&mdp, &pinned, 10, 2).unwrap();
        assert_eq!(packed.len(), 2);
    }
}
