//! Error types for the publishing core.

use super::ArtifactStatus;
use crate::draft::domain::DraftDomainError;
use crate::draft::ports::DraftRepositoryError;
use crate::publish::ports::{ArticleRepositoryError, ArtifactRepositoryError};
use crate::task::domain::TaskDomainError;
use crate::task::ports::TaskRepositoryError;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while mutating publish artifacts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishDomainError {
    /// The artifact cannot move between the given statuses.
    #[error("artifact cannot move from '{from}' to '{to}'")]
    InvalidArtifactTransition {
        /// Status the artifact held.
        from: ArtifactStatus,
        /// Status that was requested.
        to: ArtifactStatus,
    },
}

/// Caller-facing failure taxonomy for publish and schedule requests.
///
/// `InvalidTransition` and `PayloadRejected` are permanent and must not be
/// retried. `ChannelUnavailable` is transient and safe to retry thanks to
/// the idempotency-key machinery. `ConcurrentModification` requires the
/// caller to re-read current state before retrying.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// A workflow or artifact precondition was not met.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The payload violates a permanent channel constraint.
    #[error("payload rejected: {0}")]
    PayloadRejected(String),

    /// The channel could not be reached or timed out.
    #[error("channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// A concurrent writer won the compare-and-swap; re-read and retry.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Persistence-layer failure outside the taxonomy.
    #[error("persistence error: {0}")]
    Repository(Arc<dyn std::error::Error + Send + Sync>),
}

impl PublishError {
    /// Wraps a persistence error.
    pub fn repository(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Repository(Arc::new(err))
    }

    /// Returns `true` when the caller may retry the request as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ChannelUnavailable(_))
    }

    /// Returns `true` when the caller must re-fetch state before retrying.
    #[must_use]
    pub const fn requires_reread(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}

impl From<PublishDomainError> for PublishError {
    fn from(err: PublishDomainError) -> Self {
        Self::InvalidTransition(err.to_string())
    }
}

impl From<TaskDomainError> for PublishError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::InvalidTransition { .. } | TaskDomainError::ChannelNotRequested(_) => {
                Self::InvalidTransition(err.to_string())
            }
            TaskDomainError::EmptyTitle => Self::PayloadRejected(err.to_string()),
        }
    }
}

impl From<DraftDomainError> for PublishError {
    fn from(err: DraftDomainError) -> Self {
        Self::InvalidTransition(err.to_string())
    }
}

impl From<TaskRepositoryError> for PublishError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(_) => Self::NotFound(err.to_string()),
            TaskRepositoryError::RevisionConflict { .. } => {
                Self::ConcurrentModification(err.to_string())
            }
            TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::Persistence(_) => {
                Self::repository(err)
            }
        }
    }
}

impl From<DraftRepositoryError> for PublishError {
    fn from(err: DraftRepositoryError) -> Self {
        match err {
            DraftRepositoryError::NotFound(_) => Self::NotFound(err.to_string()),
            DraftRepositoryError::RevisionConflict { .. } => {
                Self::ConcurrentModification(err.to_string())
            }
            DraftRepositoryError::DuplicateDraft(_)
            | DraftRepositoryError::LiveDraftExists(_)
            | DraftRepositoryError::Persistence(_) => Self::repository(err),
        }
    }
}

impl From<ArtifactRepositoryError> for PublishError {
    fn from(err: ArtifactRepositoryError) -> Self {
        match err {
            ArtifactRepositoryError::NotFound(_) => Self::NotFound(err.to_string()),
            ArtifactRepositoryError::RevisionConflict { .. } => {
                Self::ConcurrentModification(err.to_string())
            }
            ArtifactRepositoryError::LiveArtifactExists(_)
            | ArtifactRepositoryError::Persistence(_) => Self::repository(err),
        }
    }
}

impl From<ArticleRepositoryError> for PublishError {
    fn from(err: ArticleRepositoryError) -> Self {
        Self::repository(err)
    }
}
