//! Normalized publish payload projected from a task and its draft.

use crate::draft::domain::Draft;
use crate::task::domain::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Channel-independent projection of the content to publish.
///
/// Catalog references (personas, categories, tags) pass through in
/// `metadata` unvalidated; resolving them is the catalog service's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishPayload {
    /// Headline for the piece.
    pub title: String,
    /// Full article body.
    pub content: String,
    /// Short standfirst or excerpt.
    pub excerpt: String,
    /// Author or persona reference.
    pub author: String,
    /// Copy used for social posts.
    pub social_text: String,
    /// Platform and catalog metadata passed through untouched.
    pub metadata: BTreeMap<String, Value>,
}

impl PublishPayload {
    /// Projects a payload from an approved task/draft pair.
    ///
    /// The social copy defaults to a teaser derived from the title, the
    /// same default the editorial UI pre-fills.
    #[must_use]
    pub fn from_draft(task: &Task, draft: &Draft) -> Self {
        Self {
            title: draft.title().to_owned(),
            content: draft.body().to_owned(),
            excerpt: draft.summary().to_owned(),
            author: task.author().to_owned(),
            social_text: format!("Check out our new article: {}", draft.title()),
            metadata: BTreeMap::new(),
        }
    }

    /// Replaces the social copy.
    #[must_use]
    pub fn with_social_text(mut self, text: impl Into<String>) -> Self {
        self.social_text = text.into();
        self
    }

    /// Adds a passthrough metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
