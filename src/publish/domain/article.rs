//! The durable website article record.

use super::{ArticleId, PublishPayload};
use crate::draft::domain::DraftId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A published website article, the canonical public record of a piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteArticle {
    id: ArticleId,
    task_id: TaskId,
    draft_id: DraftId,
    draft_version: u32,
    title: String,
    content: String,
    excerpt: String,
    author: String,
    published_at: DateTime<Utc>,
}

impl WebsiteArticle {
    /// Materializes an article from a publish payload.
    #[must_use]
    pub fn from_payload(
        payload: &PublishPayload,
        task_id: TaskId,
        draft_id: DraftId,
        draft_version: u32,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ArticleId::new(),
            task_id,
            draft_id,
            draft_version,
            title: payload.title.clone(),
            content: payload.content.clone(),
            excerpt: payload.excerpt.clone(),
            author: payload.author.clone(),
            published_at: clock.utc(),
        }
    }

    /// Returns the article identifier.
    #[must_use]
    pub const fn id(&self) -> ArticleId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the source draft identifier.
    #[must_use]
    pub const fn draft_id(&self) -> DraftId {
        self.draft_id
    }

    /// Returns the source draft content version.
    #[must_use]
    pub const fn draft_version(&self) -> u32 {
        self.draft_version
    }

    /// Returns the headline.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the article body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the excerpt.
    #[must_use]
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    /// Returns the author reference.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the publication timestamp.
    #[must_use]
    pub const fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}
