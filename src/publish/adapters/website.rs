//! Website channel publisher backed by the article store.

use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

use crate::publish::{
    domain::{ChannelId, PublishError, WebsiteArticle},
    ports::{ArticleRepository, ArticleRepositoryError, ChannelPublisher, DispatchRequest},
};

/// Publishes the canonical website article.
///
/// The website is the durable public record, so this publisher is
/// idempotent at its own level: if an article already exists for the
/// (task, draft version) pair it is returned unchanged rather than
/// duplicated, even if the orchestrator-level artifact check was raced.
#[derive(Clone)]
pub struct WebsitePublisher<A, C>
where
    A: ArticleRepository,
    C: Clock + Send + Sync,
{
    articles: Arc<A>,
    clock: Arc<C>,
}

impl<A, C> WebsitePublisher<A, C>
where
    A: ArticleRepository,
    C: Clock + Send + Sync,
{
    /// Creates a website publisher over the given article store.
    #[must_use]
    pub const fn new(articles: Arc<A>, clock: Arc<C>) -> Self {
        Self { articles, clock }
    }
}

/// Store faults are transient from the caller's perspective: the website
/// may be retried once it is reachable again.
fn store_fault(err: &ArticleRepositoryError) -> PublishError {
    PublishError::ChannelUnavailable(err.to_string())
}

#[async_trait]
impl<A, C> ChannelPublisher for WebsitePublisher<A, C>
where
    A: ArticleRepository,
    C: Clock + Send + Sync,
{
    fn channel(&self) -> ChannelId {
        ChannelId::Website
    }

    async fn publish(&self, request: &DispatchRequest) -> Result<String, PublishError> {
        let source = request.source;
        let existing = self
            .articles
            .find_by_draft(source.task_id, source.draft_version)
            .await
            .map_err(|err| store_fault(&err))?;
        if let Some(article) = existing {
            return Ok(article.id().to_string());
        }

        let article = WebsiteArticle::from_payload(
            &request.payload,
            source.task_id,
            source.draft_id,
            source.draft_version,
            &*self.clock,
        );
        match self.articles.store(&article).await {
            Ok(()) => Ok(article.id().to_string()),
            // A concurrent dispatch won the store; reuse its article.
            Err(ArticleRepositoryError::DuplicateArticle { .. }) => {
                let winner = self
                    .articles
                    .find_by_draft(source.task_id, source.draft_version)
                    .await
                    .map_err(|err| store_fault(&err))?;
                winner.map(|article| article.id().to_string()).ok_or_else(|| {
                    PublishError::ChannelUnavailable(
                        "article store reported a duplicate that cannot be read back".to_owned(),
                    )
                })
            }
            Err(err) => Err(store_fault(&err)),
        }
    }
}
