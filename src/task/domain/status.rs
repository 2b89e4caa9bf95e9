//! Task workflow statuses and the triggers that move between them.

use super::{ParseTaskStatusError, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Editorial workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has been created but drafting has not started.
    Backlog,
    /// A draft is being produced.
    InProgress,
    /// A draft is awaiting human review.
    NeedsReview,
    /// The draft has been approved and the task may be published.
    Approved,
    /// Publication completed for the requested channels.
    Published,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in-progress",
            Self::NeedsReview => "needs-review",
            Self::Approved => "approved",
            Self::Published => "published",
        }
    }

    /// Returns `true` when no further workflow trigger applies.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "in-progress" => Ok(Self::InProgress),
            "needs-review" => Ok(Self::NeedsReview),
            "approved" => Ok(Self::Approved),
            "published" => Ok(Self::Published),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow triggers. Each trigger is legal from exactly one source status
/// and moves the task to exactly one target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowTrigger {
    /// Draft generation has started for the task.
    DraftGenerationStarted,
    /// A draft finished generating, or the task was moved to review
    /// manually.
    DraftCompleted,
    /// The live draft was approved by a reviewer.
    DraftApproved,
    /// The live draft was rejected by a reviewer.
    DraftRejected,
    /// Publish orchestration succeeded for the requested channels.
    PublishCompleted,
}

impl WorkflowTrigger {
    /// Returns the status the trigger is legal from.
    #[must_use]
    pub const fn source(self) -> TaskStatus {
        match self {
            Self::DraftGenerationStarted => TaskStatus::Backlog,
            Self::DraftCompleted => TaskStatus::InProgress,
            Self::DraftApproved | Self::DraftRejected => TaskStatus::NeedsReview,
            Self::PublishCompleted => TaskStatus::Approved,
        }
    }

    /// Returns the status the trigger moves the task to.
    #[must_use]
    pub const fn target(self) -> TaskStatus {
        match self {
            Self::DraftGenerationStarted => TaskStatus::InProgress,
            Self::DraftCompleted => TaskStatus::NeedsReview,
            Self::DraftApproved => TaskStatus::Approved,
            Self::DraftRejected => TaskStatus::InProgress,
            Self::PublishCompleted => TaskStatus::Published,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DraftGenerationStarted => "draft-generation-started",
            Self::DraftCompleted => "draft-completed",
            Self::DraftApproved => "draft-approved",
            Self::DraftRejected => "draft-rejected",
            Self::PublishCompleted => "publish-completed",
        }
    }
}

impl fmt::Display for WorkflowTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying a workflow trigger to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The task moved to the trigger's target status.
    Transitioned,
    /// The task was already in the target status; nothing changed.
    NoOp,
}

impl TaskStatus {
    /// Validates a trigger against the current status without mutating
    /// anything.
    ///
    /// Re-applying a trigger to a task already in its target status is an
    /// idempotent no-op so callers may retry safely.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the trigger is
    /// neither legal from the current status nor a no-op.
    pub fn check(self, trigger: WorkflowTrigger) -> Result<Applied, TaskDomainError> {
        if self == trigger.source() {
            Ok(Applied::Transitioned)
        } else if self == trigger.target() {
            Ok(Applied::NoOp)
        } else {
            Err(TaskDomainError::InvalidTransition {
                from: self,
                trigger,
            })
        }
    }
}
