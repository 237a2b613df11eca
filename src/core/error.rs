use thiserror::Error;

use super::state::Ticks;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("time quantum must be at least 1, got {0}")]
    InvalidQuantum(Ticks),

    #[error("cannot schedule an empty process list")]
    EmptyInput,

    #[error("invalid process `{id}`: {reason}")]
    InvalidProcess {
        id: String,
        reason: InvalidProcessReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidProcessReason {
    #[error("burst time must be at least 1")]
    ZeroBurst,

    #[error("id is shared with another process")]
    DuplicateId,

    #[error("schedule would run past the largest representable time")]
    TimeOverflow,
}
