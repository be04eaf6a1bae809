//! Flattens a user's goal hierarchy into a single indexed task list.
//!
//! The [`ToDoList`] is the substrate the [`Mdp`](crate::mdp::Mdp) is built
//! on: it owns every [`Goal`] and [`Task`], assigns each incomplete task a
//! stable global index, and exposes the index↔goal bookkeeping the MDP
//! needs to decide, on a successful completion, whether an entire goal just
//! finished.

use crate::domain::{Goal, Task};

/// Flattened, indexed view over a set of goals plus any standalone tasks
/// that don't belong to a goal.
///
/// # Invariants
///
/// - Index order is assigned once, at construction, and never changes.
/// - Completed tasks are filtered out before indexing — they never receive
///   an index and never appear in [`ToDoList::get_tasks`].
#[derive(Debug, Clone)]
pub struct ToDoList {
    goals: Vec<Goal>,
    non_goal_tasks: Vec<Task>,
    start_time: u32,
    /// Flattened index -> owning goal index, or `None` for a non-goal task.
    index_to_goal: Vec<Option<usize>>,
    /// Flattened index -> position within the owner's own task list
    /// (`goal.tasks()` or `non_goal_tasks`).
    index_to_local: Vec<usize>,
    /// Goal index -> flattened indices of its (incomplete) tasks, in order.
    goal_to_indices: Vec<Vec<usize>>,
}

impl ToDoList {
    /// Builds a `ToDoList` from a goal hierarchy and any standalone tasks.
    ///
    /// Goals are sorted by [`Goal`]'s total order (earliest deadline, then
    /// id) before flattening, so the resulting index assignment is
    /// deterministic regardless of input order. Completed tasks are
    /// dropped before indexing.
    pub fn new(mut goals: Vec<Goal>, start_time: u32, non_goal_tasks: Vec<Task>) -> Self {
        goals.sort();

        let mut index_to_goal = Vec::new();
        let mut index_to_local = Vec::new();
        let mut goal_to_indices = vec![Vec::new(); goals.len()];

        for (goal_idx, goal) in goals.iter().enumerate() {
            for (local_idx, task) in goal.tasks().iter().enumerate() {
                if task.completed() {
                    continue;
                }
                let flat_idx = index_to_goal.len();
                index_to_goal.push(Some(goal_idx));
                index_to_local.push(local_idx);
                goal_to_indices[goal_idx].push(flat_idx);
            }
        }

        let non_goal_tasks: Vec<Task> = non_goal_tasks
            .into_iter()
            .filter(|t| !t.completed())
            .collect();
        for (local_idx, _) in non_goal_tasks.iter().enumerate() {
            let flat_idx = index_to_goal.len();
            index_to_goal.push(None);
            index_to_local.push(local_idx);
        }

        Self {
            goals,
            non_goal_tasks,
            start_time,
            index_to_goal,
            index_to_local,
            goal_to_indices,
        }
    }

    /// Total number of indexed (incomplete) tasks, `N` in the MDP's state
    /// space.
    pub fn len(&self) -> usize {
        self.index_to_goal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_goal.is_empty()
    }

    /// Number of goals, `G`.
    pub fn goal_count(&self) -> usize {
        self.goals.len()
    }

    pub fn start_time(&self) -> u32 {
        self.start_time
    }

    /// The task at flattened index `idx`.
    pub fn task(&self, idx: usize) -> &Task {
        match self.index_to_goal[idx] {
            Some(goal_idx) => &self.goals[goal_idx].tasks()[self.index_to_local[idx]],
            None => &self.non_goal_tasks[self.index_to_local[idx]],
        }
    }

    /// The goal index owning the task at flattened index `idx`, or `None`
    /// if it's a standalone task.
    pub fn owning_goal(&self, idx: usize) -> Option<usize> {
        self.index_to_goal[idx]
    }

    pub fn goal(&self, goal_idx: usize) -> &Goal {
        &self.goals[goal_idx]
    }

    pub fn get_goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Flattened indices belonging to goal `goal_idx`, in goal-task order.
    pub fn goal_indices(&self, goal_idx: usize) -> &[usize] {
        &self.goal_to_indices[goal_idx]
    }

    /// All indexed (incomplete) tasks, in index order.
    pub fn get_tasks(&self) -> Vec<&Task> {
        (0..self.len()).map(|i| self.task(i)).collect()
    }

    /// Smallest deadline across every goal, or `None` if there are no
    /// goals.
    pub fn earliest_deadline(&self) -> Option<u32> {
        self.goals.iter().map(Goal::earliest_deadline).min()
    }

    /// Largest deadline across every goal, or `None` if there are no
    /// goals.
    pub fn latest_deadline(&self) -> Option<u32> {
        self.goals.iter().map(Goal::latest_deadline).max()
    }

    /// Finds the flattened index of the task whose description equals
    /// `description`, searching only among still-legal (unresolved) tasks.
    /// Used by the day packer to resolve pinned today-task ids (§4.5).
    pub fn index_of_description(&self, description: &str) -> Option<usize> {
        (0..self.len()).find(|&i| self.task(i).description() == description)
    }
}
