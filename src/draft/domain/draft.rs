//! Draft aggregate root and its review lifecycle.

use super::{DraftDomainError, DraftId, ParseDraftStatusError};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review status of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    /// Awaiting human review.
    Pending,
    /// Accepted for publication; content is frozen.
    Approved,
    /// Sent back for rework.
    Rejected,
}

impl DraftStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` while the draft occupies the task's single live
    /// slot (`pending` or `approved`).
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl TryFrom<&str> for DraftStatus {
    type Error = ParseDraftStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseDraftStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object for registering a newly generated draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDraft {
    /// Task the draft belongs to.
    pub task_id: TaskId,
    /// Draft headline.
    pub title: String,
    /// Draft body.
    pub body: String,
    /// Draft standfirst or summary.
    pub summary: String,
}

/// Parameter object for reconstructing a persisted draft aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDraftData {
    /// Persisted draft identifier.
    pub id: DraftId,
    /// Persisted owning task.
    pub task_id: TaskId,
    /// Persisted headline.
    pub title: String,
    /// Persisted body.
    pub body: String,
    /// Persisted summary.
    pub summary: String,
    /// Persisted review status.
    pub status: DraftStatus,
    /// Persisted content version.
    pub version: u32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted optimistic version counter.
    pub revision: u64,
}

/// Draft aggregate root: one candidate piece of content for one task.
///
/// The content `version` increments on every replacement; a regenerated
/// draft supersedes the previous content in place rather than creating a
/// second live row. The `revision` counter is the optimistic-concurrency
/// guard and moves on every persisted write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    id: DraftId,
    task_id: TaskId,
    title: String,
    body: String,
    summary: String,
    status: DraftStatus,
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

impl Draft {
    /// Creates a pending version-1 draft from generated content.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::EmptyTitle`] when the title is blank.
    pub fn new(spec: NewDraft, clock: &impl Clock) -> Result<Self, DraftDomainError> {
        let title = spec.title.trim().to_owned();
        if title.is_empty() {
            return Err(DraftDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: DraftId::new(),
            task_id: spec.task_id,
            title,
            body: spec.body,
            summary: spec.summary,
            status: DraftStatus::Pending,
            version: 1,
            created_at: timestamp,
            updated_at: timestamp,
            revision: 0,
        })
    }

    /// Reconstructs a draft from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDraftData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            title: data.title,
            body: data.body,
            summary: data.summary,
            status: data.status,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
            revision: data.revision,
        }
    }

    /// Returns the draft identifier.
    #[must_use]
    pub const fn id(&self) -> DraftId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the headline.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the review status.
    #[must_use]
    pub const fn status(&self) -> DraftStatus {
        self.status
    }

    /// Returns the content version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic version counter.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the draft content, bumping the content version.
    ///
    /// Only a `pending` draft may be superseded; approval freezes the
    /// content, and a rejected draft re-enters review through a fresh
    /// replacement on the pending path.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::ContentFrozen`] once approved,
    /// [`DraftDomainError::InvalidStatus`] when rejected, and
    /// [`DraftDomainError::EmptyTitle`] for a blank title.
    pub fn replace_content(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        summary: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), DraftDomainError> {
        match self.status {
            DraftStatus::Approved => return Err(DraftDomainError::ContentFrozen),
            DraftStatus::Rejected => {
                return Err(DraftDomainError::InvalidStatus {
                    from: self.status,
                    action: "superseded",
                });
            }
            DraftStatus::Pending => {}
        }
        let new_title = title.into().trim().to_owned();
        if new_title.is_empty() {
            return Err(DraftDomainError::EmptyTitle);
        }
        self.title = new_title;
        self.body = body.into();
        self.summary = summary.into();
        self.version += 1;
        self.touch(clock);
        Ok(())
    }

    /// Approves the draft, freezing its content.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::InvalidStatus`] unless the draft is
    /// `pending`.
    pub fn approve(&mut self, clock: &impl Clock) -> Result<(), DraftDomainError> {
        if self.status != DraftStatus::Pending {
            return Err(DraftDomainError::InvalidStatus {
                from: self.status,
                action: "approved",
            });
        }
        self.status = DraftStatus::Approved;
        self.touch(clock);
        Ok(())
    }

    /// Rejects the draft, sending the task back to drafting.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDomainError::InvalidStatus`] unless the draft is
    /// `pending`.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), DraftDomainError> {
        if self.status != DraftStatus::Pending {
            return Err(DraftDomainError::InvalidStatus {
                from: self.status,
                action: "rejected",
            });
        }
        self.status = DraftStatus::Rejected;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }

    /// Advances the optimistic version counter. Reserved for repository
    /// adapters persisting a successful compare-and-swap.
    pub(crate) const fn bump_revision(&mut self) {
        self.revision += 1;
    }
}
