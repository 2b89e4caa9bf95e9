//! Task aggregate root.

use super::{
    Applied, Priority, PublishIntent, PublishSchedule, TaskDomainError, TaskId, TaskStatus,
    WorkflowTrigger,
};
use crate::publish::domain::ChannelId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Editorial headline for the work item.
    pub title: String,
    /// Identifier of the persona or author assigned to the task.
    pub author: String,
    /// Editor-assigned priority.
    pub priority: Priority,
    /// Optional editorial deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Channels the finished piece should be published to.
    pub intent: PublishIntent,
    /// Immediate or deferred publication.
    pub schedule: PublishSchedule,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted assigned author.
    pub author: String,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted deadline, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted publish intent.
    pub intent: PublishIntent,
    /// Persisted schedule.
    pub schedule: PublishSchedule,
    /// Persisted publication timestamp, if any.
    pub published_at: Option<DateTime<Utc>>,
    /// Channels already published to.
    pub published_channels: BTreeSet<ChannelId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted optimistic version counter.
    pub revision: u64,
}

/// Task aggregate root.
///
/// The workflow status mutates only through [`Task::apply`] and
/// [`Task::record_publication`]; every other field is set at creation or
/// reconstruction time, except the schedule which editors may adjust up
/// until publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    author: String,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
    intent: PublishIntent,
    schedule: PublishSchedule,
    published_at: Option<DateTime<Utc>>,
    published_channels: BTreeSet<ChannelId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

impl Task {
    /// Creates a new task in `backlog`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(spec: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = spec.title.trim().to_owned();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title,
            author: spec.author,
            priority: spec.priority,
            due_date: spec.due_date,
            status: TaskStatus::Backlog,
            intent: spec.intent,
            schedule: spec.schedule,
            published_at: None,
            published_channels: BTreeSet::new(),
            created_at: timestamp,
            updated_at: timestamp,
            revision: 0,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            author: data.author,
            priority: data.priority,
            due_date: data.due_date,
            status: data.status,
            intent: data.intent,
            schedule: data.schedule,
            published_at: data.published_at,
            published_channels: data.published_channels,
            created_at: data.created_at,
            updated_at: data.updated_at,
            revision: data.revision,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the editorial title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the assigned author reference.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the editor-assigned priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the editorial deadline, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the publish intent.
    #[must_use]
    pub const fn intent(&self) -> &PublishIntent {
        &self.intent
    }

    /// Returns the publication schedule.
    #[must_use]
    pub const fn schedule(&self) -> PublishSchedule {
        self.schedule
    }

    /// Returns the first successful publication time, if any.
    #[must_use]
    pub const fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Returns the channels the task has been published to.
    #[must_use]
    pub const fn published_channels(&self) -> &BTreeSet<ChannelId> {
        &self.published_channels
    }

    /// Returns the channels requested but not yet published.
    #[must_use]
    pub fn unpublished_channels(&self) -> BTreeSet<ChannelId> {
        self.intent
            .channels()
            .difference(&self.published_channels)
            .copied()
            .collect()
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

    /// Applies a workflow trigger.
    ///
    /// Re-applying a trigger to a task already in the target status is an
    /// idempotent no-op; the aggregate, including `updated_at`, is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the trigger is
    /// not legal from the current status. The aggregate is unchanged on
    /// error.
    pub fn apply(
        &mut self,
        trigger: WorkflowTrigger,
        clock: &impl Clock,
    ) -> Result<Applied, TaskDomainError> {
        match self.status.check(trigger)? {
            Applied::NoOp => Ok(Applied::NoOp),
            Applied::Transitioned => {
                self.status = trigger.target();
                self.touch(clock);
                Ok(Applied::Transitioned)
            }
        }
    }

    /// Records a completed publication for the given channels.
    ///
    /// Drives the `publish-completed` trigger, unions `channels` into the
    /// published set, and stamps `published_at` on first publication.
    /// Recording further channels on an already-published task is the
    /// idempotent retry path and extends the published set without
    /// resetting `published_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ChannelNotRequested`] when a channel is
    /// outside the publish intent, or [`TaskDomainError::InvalidTransition`]
    /// when the task is neither `approved` nor `published`. The aggregate
    /// is unchanged on error.
    pub fn record_publication(
        &mut self,
        channels: impl IntoIterator<Item = ChannelId>,
        clock: &impl Clock,
    ) -> Result<Applied, TaskDomainError> {
        let requested = self.intent.channels();
        let additions: BTreeSet<ChannelId> = channels.into_iter().collect();
        if let Some(extra) = additions.difference(&requested).next() {
            return Err(TaskDomainError::ChannelNotRequested(*extra));
        }

        let applied = self.status.check(WorkflowTrigger::PublishCompleted)?;
        self.status = TaskStatus::Published;
        self.published_channels.extend(additions);
        let now = clock.utc();
        if self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.updated_at = now;
        Ok(applied)
    }

    /// Replaces the publication schedule.
    ///
    /// Scheduling metadata is not a workflow transition; it may change up
    /// until the task is published.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the task is
    /// already published.
    pub fn set_schedule(
        &mut self,
        schedule: PublishSchedule,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::InvalidTransition {
                from: self.status,
                trigger: WorkflowTrigger::PublishCompleted,
            });
        }
        self.schedule = schedule;
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
