use thiserror::Error;

/// Errors raised while constructing or validating domain entities.
///
/// Each variant names the offending entity so the caller can surface a
/// single, actionable failure (per the "report the first offending entity"
/// contract of the solver's validation layer).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("task '{description}' has a non-positive time estimate: {time_est}")]
    NonPositiveTimeEstimate { description: String, time_est: i64 },

    #[error("task '{description}' has an invalid success probability: {prob}")]
    InvalidProbability { description: String, prob: f64 },

    #[error("goal '{description}' has no tasks")]
    EmptyGoal { description: String },

    #[error("goal '{description}' has no reward schedule")]
    EmptyRewardSchedule { description: String },

    #[error(
        "goal '{description}' deadline {deadline} is not after the solve start time {start_time}"
    )]
    DeadlineNotInFuture {
        description: String,
        deadline: i64,
        start_time: i64,
    },

    #[error("goal '{description}' deadline {deadline} exceeds the one-year scheduling horizon")]
    DeadlineTooFar { description: String, deadline: i64 },

    #[error("goal '{description}' has a negative value")]
    NegativeValue { description: String },

    #[error(
        "task '{task}' deadline {task_deadline} is after its goal's latest deadline {goal_deadline}"
    )]
    TaskDeadlineAfterGoalDeadline {
        task: String,
        task_deadline: i64,
        goal_deadline: i64,
    },
}
