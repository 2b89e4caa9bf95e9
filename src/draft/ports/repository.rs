//! Repository port for draft persistence and live-draft lookup.

use crate::draft::domain::{Draft, DraftId};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for draft repository operations.
pub type DraftRepositoryResult<T> = Result<T, DraftRepositoryError>;

/// Draft persistence contract.
///
/// Enforces the one-live-draft invariant: at most one `pending` or
/// `approved` draft exists per task. `update` is a compare-and-swap on
/// the revision counter so racing reviewers resolve deterministically.
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Stores a new draft.
    ///
    /// # Errors
    ///
    /// Returns [`DraftRepositoryError::DuplicateDraft`] when the draft ID
    /// already exists and [`DraftRepositoryError::LiveDraftExists`] when
    /// the task already holds a live draft.
    async fn store(&self, draft: &Draft) -> DraftRepositoryResult<()>;

    /// Persists changes to an existing draft if its revision is current.
    ///
    /// On success returns the persisted aggregate carrying the advanced
    /// revision.
    ///
    /// # Errors
    ///
    /// Returns [`DraftRepositoryError::NotFound`] when the draft does not
    /// exist and [`DraftRepositoryError::RevisionConflict`] when another
    /// writer has advanced the record since it was read.
    async fn update(&self, draft: &Draft) -> DraftRepositoryResult<Draft>;

    /// Finds a draft by identifier.
    ///
    /// Returns `None` when the draft does not exist.
    async fn find_by_id(&self, id: DraftId) -> DraftRepositoryResult<Option<Draft>>;

    /// Returns the task's live (`pending` or `approved`) draft, if any.
    async fn live_draft_for_task(&self, task_id: TaskId) -> DraftRepositoryResult<Option<Draft>>;
}

/// Errors returned by draft repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DraftRepositoryError {
    /// A draft with the same identifier already exists.
    #[error("duplicate draft identifier: {0}")]
    DuplicateDraft(DraftId),

    /// The task already holds a live draft.
    #[error("task {0} already has a live draft")]
    LiveDraftExists(TaskId),

    /// The draft was not found.
    #[error("draft not found: {0}")]
    NotFound(DraftId),

    /// Another writer advanced the record since it was read.
    #[error("draft {id} was modified concurrently (read revision {read}, stored {stored})")]
    RevisionConflict {
        /// The contested draft.
        id: DraftId,
        /// Revision the losing writer had read.
        read: u64,
        /// Revision currently stored.
        stored: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DraftRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
