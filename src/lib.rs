//! A personal task-scheduling engine built on an exact Markov Decision
//! Process over "which tasks are done" × "elapsed time".
//!
//! Given a hierarchy of goals — each with a deadline→reward schedule and
//! a lateness penalty — and their leaf-level tasks, this crate decides
//! which tasks to do today by solving the MDP with one of three
//! interchangeable solvers ([`solvers::backward_induction`],
//! [`solvers::policy_iteration`], [`solvers::value_iteration`]) and
//! packing the resulting policy into a time-bounded schedule
//! ([`day_packer`]).
//!
//! [`external::solve_day`] is the single entry point most callers want;
//! the rest of the crate is exposed for callers that need to drive the
//! MDP directly.

pub mod config;
pub mod day_packer;
pub mod domain;
pub mod external;
pub mod mdp;
pub mod point_assigners;
pub mod reward_scaling;
pub mod solvers;
pub mod todo_list;

pub use config::SolverConfig;
pub use domain::{Goal, Task, ValidationError};
pub use external::{solve_day, ProjectGoal, ProjectTask, RewardDisplay, TodayItem};
pub use mdp::{ContractError, Mdp};
pub use reward_scaling::RewardScaler;
pub use solvers::{SolveError, SolverKind};
pub use todo_list::ToDoList;
