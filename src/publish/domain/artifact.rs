//! Durable publish artifacts and their idempotency key.

use super::{ArtifactId, ChannelId, PublishDomainError};
use crate::draft::domain::DraftId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authoritative duplicate-suppression key for publish dispatch.
///
/// At most one non-failed artifact may exist per key; retries reuse or
/// supersede the existing record rather than creating a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdempotencyKey {
    /// Owning task.
    pub task_id: TaskId,
    /// Content version of the draft being published.
    pub draft_version: u32,
    /// Target channel.
    pub channel: ChannelId,
}

impl IdempotencyKey {
    /// Creates a key from its parts.
    #[must_use]
    pub const fn new(task_id: TaskId, draft_version: u32, channel: ChannelId) -> Self {
        Self {
            task_id,
            draft_version,
            channel,
        }
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/v{}/{}",
            self.task_id, self.draft_version, self.channel
        )
    }
}

/// Lifecycle status of a publish artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    /// Placeholder awaiting promotion by a time-driven executor.
    Scheduled,
    /// Dispatch to the channel publisher is in flight.
    Publishing,
    /// The channel accepted the content.
    Published,
    /// The channel rejected the content or was unreachable.
    Failed,
}

impl ArtifactStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Publishing => "publishing",
            Self::Published => "published",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for every status except `failed`.
    ///
    /// A live artifact blocks creation of another artifact for the same
    /// idempotency key.
    #[must_use]
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The durable record of one channel's publication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishArtifact {
    id: ArtifactId,
    task_id: TaskId,
    draft_id: DraftId,
    draft_version: u32,
    channel: ChannelId,
    status: ArtifactStatus,
    target_time: Option<DateTime<Utc>>,
    published_at: Option<DateTime<Utc>>,
    external_ref: Option<String>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

/// Parameter object naming the records an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactSource {
    /// Owning task.
    pub task_id: TaskId,
    /// Draft whose content is being published.
    pub draft_id: DraftId,
    /// Content version of that draft.
    pub draft_version: u32,
    /// Target channel.
    pub channel: ChannelId,
}

impl PublishArtifact {
    /// Creates a `scheduled` placeholder for deferred execution.
    #[must_use]
    pub fn scheduled(source: ArtifactSource, target_time: DateTime<Utc>, clock: &impl Clock) -> Self {
        Self::with_status(source, ArtifactStatus::Scheduled, Some(target_time), clock)
    }

    /// Creates an artifact entering dispatch immediately.
    #[must_use]
    pub fn dispatched(source: ArtifactSource, clock: &impl Clock) -> Self {
        Self::with_status(source, ArtifactStatus::Publishing, None, clock)
    }

    fn with_status(
        source: ArtifactSource,
        status: ArtifactStatus,
        target_time: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ArtifactId::new(),
            task_id: source.task_id,
            draft_id: source.draft_id,
            draft_version: source.draft_version,
            channel: source.channel,
            status,
            target_time,
            published_at: None,
            external_ref: None,
            error: None,
            created_at: timestamp,
            updated_at: timestamp,
            revision: 0,
        }
    }

    /// Returns the artifact identifier.
    #[must_use]
    pub const fn id(&self) -> ArtifactId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the owning draft identifier.
    #[must_use]
    pub const fn draft_id(&self) -> DraftId {
        self.draft_id
    }

    /// Returns the published draft content version.
    #[must_use]
    pub const fn draft_version(&self) -> u32 {
        self.draft_version
    }

    /// Returns the target channel.
    #[must_use]
    pub const fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Returns the artifact lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ArtifactStatus {
        self.status
    }

    /// Returns the deferred execution time, if any.
    #[must_use]
    pub const fn target_time(&self) -> Option<DateTime<Utc>> {
        self.target_time
    }

    /// Returns the successful publication time, if any.
    #[must_use]
    pub const fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Returns the channel-side reference (article id, platform post id).
    #[must_use]
    pub fn external_ref(&self) -> Option<&str> {
        self.external_ref.as_deref()
    }

    /// Returns the failure message, if the artifact failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
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

    /// Returns the artifact's idempotency key.
    #[must_use]
    pub const fn key(&self) -> IdempotencyKey {
        IdempotencyKey::new(self.task_id, self.draft_version, self.channel)
    }

    /// Marks the artifact as entering dispatch.
    ///
    /// Promotes a `scheduled` placeholder; re-marking an artifact already
    /// `publishing` is a no-op so a crashed dispatch can be re-driven.
    ///
    /// # Errors
    ///
    /// Returns [`PublishDomainError::InvalidArtifactTransition`] from
    /// `published` or `failed`.
    pub fn mark_publishing(&mut self, clock: &impl Clock) -> Result<(), PublishDomainError> {
        match self.status {
            ArtifactStatus::Scheduled => {
                self.status = ArtifactStatus::Publishing;
                self.touch(clock);
                Ok(())
            }
            ArtifactStatus::Publishing => Ok(()),
            from @ (ArtifactStatus::Published | ArtifactStatus::Failed) => {
                Err(PublishDomainError::InvalidArtifactTransition {
                    from,
                    to: ArtifactStatus::Publishing,
                })
            }
        }
    }

    /// Records a successful publication with the channel-side reference.
    ///
    /// # Errors
    ///
    /// Returns [`PublishDomainError::InvalidArtifactTransition`] unless the
    /// artifact is `publishing`.
    pub fn complete(
        &mut self,
        external_ref: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), PublishDomainError> {
        if self.status != ArtifactStatus::Publishing {
            return Err(PublishDomainError::InvalidArtifactTransition {
                from: self.status,
                to: ArtifactStatus::Published,
            });
        }
        self.status = ArtifactStatus::Published;
        self.external_ref = Some(external_ref.into());
        let now = clock.utc();
        self.published_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Records a failed publication attempt.
    ///
    /// # Errors
    ///
    /// Returns [`PublishDomainError::InvalidArtifactTransition`] when the
    /// artifact has already published.
    pub fn fail(
        &mut self,
        error: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), PublishDomainError> {
        match self.status {
            ArtifactStatus::Scheduled | ArtifactStatus::Publishing | ArtifactStatus::Failed => {
                self.status = ArtifactStatus::Failed;
                self.error = Some(error.into());
                self.touch(clock);
                Ok(())
            }
            ArtifactStatus::Published => Err(PublishDomainError::InvalidArtifactTransition {
                from: ArtifactStatus::Published,
                to: ArtifactStatus::Failed,
            }),
        }
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
