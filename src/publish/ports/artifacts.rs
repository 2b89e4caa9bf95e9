//! Repository port for publish artifact persistence.

use crate::publish::domain::{ArtifactId, IdempotencyKey, PublishArtifact};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for artifact repository operations.
pub type ArtifactRepositoryResult<T> = Result<T, ArtifactRepositoryError>;

/// Publish artifact persistence contract.
///
/// Enforces the idempotency invariant: at most one non-failed artifact
/// exists per (task, draft version, channel) key.
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Stores a new artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::LiveArtifactExists`] when a
    /// non-failed artifact already holds the same idempotency key.
    async fn store(&self, artifact: &PublishArtifact) -> ArtifactRepositoryResult<()>;

    /// Persists changes to an existing artifact if its revision is
    /// current.
    ///
    /// On success returns the persisted record carrying the advanced
    /// revision.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRepositoryError::NotFound`] when the artifact
    /// does not exist and [`ArtifactRepositoryError::RevisionConflict`]
    /// when another writer has advanced it.
    async fn update(&self, artifact: &PublishArtifact) -> ArtifactRepositoryResult<PublishArtifact>;

    /// Finds an artifact by identifier.
    ///
    /// Returns `None` when the artifact does not exist.
    async fn find_by_id(&self, id: ArtifactId) -> ArtifactRepositoryResult<Option<PublishArtifact>>;

    /// Returns the live (non-failed) artifact for the key, if any.
    async fn find_live(
        &self,
        key: &IdempotencyKey,
    ) -> ArtifactRepositoryResult<Option<PublishArtifact>>;

    /// Returns every artifact belonging to the task, newest first.
    async fn find_for_task(&self, task_id: TaskId)
    -> ArtifactRepositoryResult<Vec<PublishArtifact>>;
}

/// Errors returned by artifact repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ArtifactRepositoryError {
    /// A non-failed artifact already exists for the idempotency key.
    #[error("live artifact already exists for key {0}")]
    LiveArtifactExists(IdempotencyKey),

    /// The artifact was not found.
    #[error("artifact not found: {0}")]
    NotFound(ArtifactId),

    /// Another writer advanced the record since it was read.
    #[error("artifact {id} was modified concurrently (read revision {read}, stored {stored})")]
    RevisionConflict {
        /// The contested artifact.
        id: ArtifactId,
        /// Revision the losing writer had read.
        read: u64,
        /// Revision currently stored.
        stored: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ArtifactRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
