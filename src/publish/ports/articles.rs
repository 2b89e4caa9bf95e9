//! Repository port for the website article store.

use crate::publish::domain::{ArticleId, WebsiteArticle};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for article repository operations.
pub type ArticleRepositoryResult<T> = Result<T, ArticleRepositoryError>;

/// Website article persistence contract.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Stores a new article.
    ///
    /// # Errors
    ///
    /// Returns [`ArticleRepositoryError::DuplicateArticle`] when an
    /// article already exists for the same (task, draft version) pair.
    async fn store(&self, article: &WebsiteArticle) -> ArticleRepositoryResult<()>;

    /// Finds an article by identifier.
    ///
    /// Returns `None` when the article does not exist.
    async fn find_by_id(&self, id: ArticleId) -> ArticleRepositoryResult<Option<WebsiteArticle>>;

    /// Returns the article published for the given task and draft
    /// version, if any.
    async fn find_by_draft(
        &self,
        task_id: TaskId,
        draft_version: u32,
    ) -> ArticleRepositoryResult<Option<WebsiteArticle>>;
}

/// Errors returned by article repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ArticleRepositoryError {
    /// An article already exists for the (task, draft version) pair.
    #[error("article already published for task {task_id} draft version {draft_version}")]
    DuplicateArticle {
        /// Owning task.
        task_id: TaskId,
        /// Draft content version.
        draft_version: u32,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ArticleRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
