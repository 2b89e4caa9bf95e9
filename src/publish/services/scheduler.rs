//! Immediate-versus-deferred publish decisions.

use crate::draft::{
    domain::{Draft, DraftStatus},
    ports::DraftRepository,
};
use crate::publish::{
    domain::{ArtifactSource, IdempotencyKey, PublishArtifact, PublishError, ScheduleHandle},
    ports::ArtifactRepository,
    services::PublishOrchestrator,
};
use crate::task::{
    domain::{PublishSchedule, Task, TaskId, TaskStatus},
    ports::TaskRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Decides whether a publish request executes now or is persisted as a
/// deferred intent.
///
/// Immediate mode delegates to the [`PublishOrchestrator`] synchronously.
/// Scheduled mode persists one `scheduled` placeholder artifact per
/// pending channel and returns without touching any publisher; an
/// external time-driven executor later calls
/// [`PublishOrchestrator::request_publish`], whose idempotency check
/// promotes the placeholders through the normal dispatch path.
pub struct SchedulerGateway<T, D, A, C>
where
    T: TaskRepository + 'static,
    D: DraftRepository + 'static,
    A: ArtifactRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    tasks: Arc<T>,
    drafts: Arc<D>,
    artifacts: Arc<A>,
    orchestrator: Arc<PublishOrchestrator<T, D, A, C>>,
    clock: Arc<C>,
}

impl<T, D, A, C> SchedulerGateway<T, D, A, C>
where
    T: TaskRepository + 'static,
    D: DraftRepository + 'static,
    A: ArtifactRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a scheduler gateway over the same stores as the
    /// orchestrator it delegates to.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        drafts: Arc<D>,
        artifacts: Arc<A>,
        orchestrator: Arc<PublishOrchestrator<T, D, A, C>>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            drafts,
            artifacts,
            orchestrator,
            clock,
        }
    }

    /// Executes or defers a publish request for the task.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::PayloadRejected`] for a target time not in
    /// the future or an empty publish intent; otherwise the same failure
    /// taxonomy as [`PublishOrchestrator::request_publish`].
    pub async fn schedule_publish(
        &self,
        task_id: TaskId,
        schedule: PublishSchedule,
    ) -> Result<ScheduleHandle, PublishError> {
        match schedule {
            PublishSchedule::Immediate => {
                let outcome = self.orchestrator.request_publish(task_id).await?;
                Ok(ScheduleHandle::Completed(outcome))
            }
            PublishSchedule::Scheduled { target_time } => {
                let now = self.clock.utc();
                if target_time <= now {
                    return Err(PublishError::PayloadRejected(format!(
                        "target time {target_time} is not in the future (now {now})"
                    )));
                }
                self.defer(task_id, target_time).await
            }
        }
    }

    /// Persists the deferred intent: schedule metadata on the task plus
    /// one placeholder artifact per channel not already live.
    async fn defer(
        &self,
        task_id: TaskId,
        target_time: DateTime<Utc>,
    ) -> Result<ScheduleHandle, PublishError> {
        let mut task = self.load_approved_task(task_id).await?;
        let draft = self.load_approved_draft(&task).await?;

        let channels = task.intent().channels();
        if channels.is_empty() {
            return Err(PublishError::PayloadRejected(
                "publish intent selects no channels".to_owned(),
            ));
        }

        task.set_schedule(PublishSchedule::Scheduled { target_time }, &*self.clock)?;
        self.tasks.update(&task).await?;

        let mut artifact_ids = Vec::with_capacity(channels.len());
        for channel in channels {
            let key = IdempotencyKey::new(task_id, draft.version(), channel);
            if self.artifacts.find_live(&key).await?.is_some() {
                continue;
            }
            let placeholder = PublishArtifact::scheduled(
                ArtifactSource {
                    task_id,
                    draft_id: draft.id(),
                    draft_version: draft.version(),
                    channel,
                },
                target_time,
                &*self.clock,
            );
            self.artifacts.store(&placeholder).await?;
            artifact_ids.push(placeholder.id());
        }

        tracing::info!(
            task_id = %task_id,
            %target_time,
            placeholders = artifact_ids.len(),
            "publish deferred"
        );
        Ok(ScheduleHandle::Deferred {
            target_time,
            artifact_ids,
        })
    }

    async fn load_approved_task(&self, task_id: TaskId) -> Result<Task, PublishError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| PublishError::NotFound(format!("task {task_id}")))?;
        if task.status() != TaskStatus::Approved {
            return Err(PublishError::InvalidTransition(format!(
                "task {task_id} is '{}', scheduling requires 'approved'",
                task.status()
            )));
        }
        Ok(task)
    }

    async fn load_approved_draft(&self, task: &Task) -> Result<Draft, PublishError> {
        let draft = self
            .drafts
            .live_draft_for_task(task.id())
            .await?
            .ok_or_else(|| PublishError::NotFound(format!("no live draft for task {}", task.id())))?;
        if draft.status() != DraftStatus::Approved {
            return Err(PublishError::InvalidTransition(format!(
                "draft {} is '{}', scheduling requires 'approved'",
                draft.id(),
                draft.status()
            )));
        }
        Ok(draft)
    }
}
