//! Error types for task domain validation and transitions.

use super::{TaskStatus, WorkflowTrigger};
use crate::publish::domain::ChannelId;
use thiserror::Error;

/// Errors returned while mutating or constructing task aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The trigger is not legal from the current status.
    #[error("invalid transition: trigger '{trigger}' is not legal from status '{from}'")]
    InvalidTransition {
        /// Status the task held when the trigger was applied.
        from: TaskStatus,
        /// Trigger that was rejected.
        trigger: WorkflowTrigger,
    },

    /// A publication was recorded for a channel the task never requested.
    #[error("channel '{0}' is not part of the task's publish intent")]
    ChannelNotRequested(ChannelId),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
