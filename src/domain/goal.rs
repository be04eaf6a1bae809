use std::collections::BTreeMap;

use super::error::ValidationError;
use super::task::Task;

/// One year of scheduling horizon, expressed in minutes. Deadlines further
/// out than this are rejected by [`Goal::new`] (§7: "invalid deadline...
/// > year limit").
pub const YEAR_LIMIT_MINUTES: u32 = 365 * 24 * 60;

/// A user-level objective: an ordered sequence of tasks, a deadline→reward
/// schedule, and a lateness penalty.
///
/// # Invariants
///
/// - `tasks` is nonempty
/// - `rewards` is nonempty
/// - every key in `rewards` is strictly after `start_time` and within the
///   one-year scheduling horizon
/// - `penalty <= 0`
///
/// A task's own deadline, when the caller supplies one, must not fall
/// after its goal's latest deadline — but `Task` itself carries no
/// deadline field (§3 keeps it minimal), so that check happens one layer
/// up, in `external::build_todo_list`, before a `Task` is ever built.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    description: String,
    goal_id: String,
    tasks: Vec<Task>,
    rewards: BTreeMap<u32, f64>,
    penalty: f64,
}

impl Goal {
    /// Creates a new goal, validating tasks, reward schedule, and penalty.
    ///
    /// `start_time` is the solve's elapsed-time origin; every deadline must
    /// lie strictly after it.
    pub fn new(
        description: impl Into<String>,
        goal_id: impl Into<String>,
        tasks: Vec<Task>,
        rewards: BTreeMap<u32, f64>,
        penalty: f64,
        start_time: u32,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        let goal_id = goal_id.into();

        if tasks.is_empty() {
            return Err(ValidationError::EmptyGoal { description });
        }
        if rewards.is_empty() {
            return Err(ValidationError::EmptyRewardSchedule { description });
        }
        for (&deadline, &value) in &rewards {
            if deadline <= start_time {
                return Err(ValidationError::DeadlineNotInFuture {
                    description,
                    deadline: deadline as i64,
                    start_time: start_time as i64,
                });
            }
            if deadline > YEAR_LIMIT_MINUTES {
                return Err(ValidationError::DeadlineTooFar {
                    description,
                    deadline: deadline as i64,
                });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeValue { description });
            }
        }

        Ok(Self {
            description,
            goal_id,
            tasks,
            rewards,
            penalty,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn goal_id(&self) -> &str {
        &self.goal_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn rewards(&self) -> &BTreeMap<u32, f64> {
        &self.rewards
    }

    /// The smallest deadline in this goal's reward schedule.
    pub fn earliest_deadline(&self) -> u32 {
        *self.rewards.keys().next().expect("rewards nonempty")
    }

    /// Alias matching the spec's naming for the MDP's deadline bookkeeping.
    pub fn get_latest_deadline_time(&self) -> u32 {
        self.latest_deadline()
    }

    /// The largest deadline in this goal's reward schedule.
    pub fn latest_deadline(&self) -> u32 {
        *self.rewards.keys().next_back().expect("rewards nonempty")
    }

    /// Reward for completing this goal at elapsed time `t`: the value
    /// associated with the smallest deadline `>= t`, or `penalty` if every
    /// deadline has already passed.
    pub fn get_reward(&self, t: u32) -> f64 {
        self.rewards
            .range(t..)
            .next()
            .map(|(_, &value)| value)
            .unwrap_or(self.penalty)
    }
}

/// Goals are totally ordered by earliest deadline (ties broken by id) so
/// downstream bookkeeping — assigning stable goal indices, breaking ties in
/// display ordering — has one canonical ordering to rely on.
impl PartialOrd for Goal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Goal {}

impl Ord for Goal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.earliest_deadline()
            .cmp(&other.earliest_deadline())
            .then_with(|| self.goal_id.cmp(&other.goal_id))
    }
}
