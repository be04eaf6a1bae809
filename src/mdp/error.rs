use thiserror::Error;

use super::state::StateKey;

/// Errors that indicate a caller violated the MDP's contract rather than
/// a problem with the input data (§7: "Contract errors indicate a bug and
/// should not be caught").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("action {action} is illegal in state {state:?}: task already resolved")]
    IllegalAction { action: usize, state: StateKey },

    #[error("action index {action} is out of range for a to-do list of {len} tasks")]
    ActionOutOfRange { action: usize, len: usize },

    #[error("to-do list has no tasks")]
    EmptyToDoList,

    #[error("pinned today-task id '{0}' was not found among legal actions")]
    PinnedTaskNotFound(String),
}
