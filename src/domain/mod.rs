//! Immutable domain model: [`Task`] and [`Goal`].
//!
//! Both types are frozen after construction (§3 of the design: "Immutable
//! after construction"). Validation happens once, at the constructor, so
//! every later consumer — the to-do list, the MDP, the solvers — can treat
//! a `Task`/`Goal` as already-correct.

mod error;
mod goal;
mod task;

pub use error::ValidationError;
pub use goal::{Goal, YEAR_LIMIT_MINUTES};
pub use task::Task;
