//! Non-MDP point-assignment strategies.
//!
//! These exist for callers that want a display value for a task without
//! paying for a full MDP solve — a quick heuristic fallback, not a
//! replacement for [`crate::mdp::Mdp`]'s pseudo-rewards.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Task;

/// Assigns a display point value to each task in a slice, independent of
/// any MDP solve.
pub trait PointAssigner {
    /// Returns `(task_index, points)` for every task in `tasks`.
    fn assign(&mut self, tasks: &[&Task]) -> Vec<(usize, f64)>;
}

/// Every task gets the same fixed value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPointAssigner {
    pub value: f64,
}

impl PointAssigner for ConstantPointAssigner {
    fn assign(&mut self, tasks: &[&Task]) -> Vec<(usize, f64)> {
        (0..tasks.len()).map(|i| (i, self.value)).collect()
    }
}

/// Uniform-random value in `[min, max]` per task, from a seeded RNG so
/// runs are reproducible.
#[derive(Debug)]
pub struct RandomPointAssigner {
    rng: StdRng,
    min: f64,
    max: f64,
}

impl RandomPointAssigner {
    pub fn new(seed: u64, min: f64, max: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            min,
            max,
        }
    }
}

impl PointAssigner for RandomPointAssigner {
    fn assign(&mut self, tasks: &[&Task]) -> Vec<(usize, f64)> {
        (0..tasks.len())
            .map(|i| (i, self.rng.gen_range(self.min..=self.max)))
            .collect()
    }
}

/// Value scales linearly with a task's time estimate: `rate * time_est`.
#[derive(Debug, Clone, Copy)]
pub struct LengthProportionalPointAssigner {
    pub rate: f64,
}

impl PointAssigner for LengthProportionalPointAssigner {
    fn assign(&mut self, tasks: &[&Task]) -> Vec<(usize, f64)> {
        tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (i, self.rate * t.time_est() as f64))
            .collect()
    }
}
