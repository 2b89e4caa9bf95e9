//! In-memory website article store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::publish::{
    domain::{ArticleId, WebsiteArticle},
    ports::{ArticleRepository, ArticleRepositoryError, ArticleRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory article repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArticleRepository {
    state: Arc<RwLock<ArticleState>>,
}

#[derive(Debug, Default)]
struct ArticleState {
    articles: HashMap<ArticleId, WebsiteArticle>,
    draft_index: HashMap<(TaskId, u32), ArticleId>,
}

impl InMemoryArticleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map(|state| state.articles.len()).unwrap_or(0)
    }

    /// Returns `true` if no articles are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> ArticleRepositoryError {
    ArticleRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn store(&self, article: &WebsiteArticle) -> ArticleRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let key = (article.task_id(), article.draft_version());
        if state.draft_index.contains_key(&key) {
            return Err(ArticleRepositoryError::DuplicateArticle {
                task_id: article.task_id(),
                draft_version: article.draft_version(),
            });
        }
        state.draft_index.insert(key, article.id());
        state.articles.insert(article.id(), article.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ArticleId) -> ArticleRepositoryResult<Option<WebsiteArticle>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.articles.get(&id).cloned())
    }

    async fn find_by_draft(
        &self,
        task_id: TaskId,
        draft_version: u32,
    ) -> ArticleRepositoryResult<Option<WebsiteArticle>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .draft_index
            .get(&(task_id, draft_version))
            .and_then(|id| state.articles.get(id))
            .cloned())
    }
}
