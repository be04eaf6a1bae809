use super::error::ValidationError;

/// An atomic, indivisible unit of work belonging to a [`Goal`](super::Goal)
/// (or, for standalone "non-goal" tasks, to no goal at all).
///
/// Immutable after construction: every field is fixed at build time and the
/// MDP never mutates a `Task` while solving.
///
/// # Invariants
///
/// - `time_est > 0`
/// - `prob` is in `(0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    description: String,
    time_est: u32,
    prob: f64,
    completed: bool,
}

impl Task {
    /// Creates a new task, validating the time estimate and success
    /// probability invariants.
    pub fn new(
        description: impl Into<String>,
        time_est: u32,
        prob: f64,
        completed: bool,
    ) -> Result<Self, ValidationError> {
        let description = description.into();

        if time_est == 0 {
            return Err(ValidationError::NonPositiveTimeEstimate {
                description,
                time_est: 0,
            });
        }
        if !(prob > 0.0 && prob <= 1.0) {
            return Err(ValidationError::InvalidProbability { description, prob });
        }

        Ok(Self {
            description,
            time_est,
            prob,
            completed,
        })
    }

    /// Creates a task with success probability 1 (deterministic completion).
    pub fn certain(description: impl Into<String>, time_est: u32) -> Result<Self, ValidationError> {
        Self::new(description, time_est, 1.0, false)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn time_est(&self) -> u32 {
        self.time_est
    }

    pub fn prob(&self) -> f64 {
        self.prob
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the task's time estimate in minutes.
    ///
    /// Kept distinct from [`Task::time_est`] so callers reading the MDP's
    /// transition arithmetic can spell out units at call sites.
    pub fn get_time_est(&self) -> u32 {
        self.time_est
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_time_estimate() {
        let err = Task::new("t", 0, 1.0, false).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveTimeEstimate { .. }));
    }

    #[test]
    fn rejects_invalid_probability() {
        assert!(Task::new("t", 10, 0.0, false).is_err());
        assert!(Task::new("t", 10, 1.5, false).is_err());
        assert!(Task::new("t", 10, -0.1, false).is_err());
    }

    #[test]
    fn accepts_boundary_probability() {
        assert!(Task::new("t", 10, 1.0, false).is_ok());
        assert!(Task::new("t", 10, 0.0001, false).is_ok());
    }

    #[test]
    fn certain_task_has_probability_one() {
        let t = Task::certain("t", 5).unwrap();
        assert_eq!(t.prob(), 1.0);
        assert!(!t.completed());
    }
}
