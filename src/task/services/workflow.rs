//! Service layer for task creation and workflow transitions.

use crate::task::{
    domain::{
        Applied, NewTask, Priority, PublishIntent, PublishSchedule, Task, TaskDomainError, TaskId,
        TaskStatus, WorkflowTrigger,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating an editorial task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    title: String,
    author: String,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    intent: PublishIntent,
    schedule: PublishSchedule,
}

impl NewTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            priority: Priority::Medium,
            due_date: None,
            intent: PublishIntent::website_only(),
            schedule: PublishSchedule::Immediate,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the editorial deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the publish intent.
    #[must_use]
    pub fn with_intent(mut self, intent: PublishIntent) -> Self {
        self.intent = intent;
        self
    }

    /// Sets the publication schedule.
    #[must_use]
    pub const fn with_schedule(mut self, schedule: PublishSchedule) -> Self {
        self.schedule = schedule;
        self
    }
}

/// Service-level errors for task workflow operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// Domain validation or transition failure.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task workflow service operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;

/// Orchestrates task creation and the workflow state machine.
///
/// Every status mutation funnels through [`Self::apply_trigger`], a
/// read-check-write cycle guarded by the repository's compare-and-swap so
/// racing actors cannot interleave into an invalid composite state.
pub struct TaskWorkflowService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

// Derived `Clone` would demand `R: Clone, C: Clone`; only the handles
// need cloning.
impl<R, C> Clone for TaskWorkflowService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskWorkflowService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task workflow service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task in `backlog`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when validation fails or the
    /// repository rejects persistence.
    pub async fn create(&self, request: NewTaskRequest) -> TaskWorkflowResult<Task> {
        let task = Task::new(
            NewTask {
                title: request.title,
                author: request.author,
                priority: request.priority,
                due_date: request.due_date,
                intent: request.intent,
                schedule: request.schedule,
            },
            &*self.clock,
        )?;
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Applies a workflow trigger to the task.
    ///
    /// A trigger whose target matches the current status is an idempotent
    /// no-op: the stored record is returned untouched and no write is
    /// issued.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Domain`] for an illegal transition,
    /// [`TaskRepositoryError::NotFound`] for an unknown task, and
    /// [`TaskRepositoryError::RevisionConflict`] when a concurrent writer
    /// wins; the caller must re-read before retrying.
    pub async fn apply_trigger(
        &self,
        task_id: TaskId,
        trigger: WorkflowTrigger,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.require(task_id).await?;
        match task.apply(trigger, &*self.clock)? {
            Applied::NoOp => Ok(task),
            Applied::Transitioned => {
                let updated = self.repository.update(&task).await?;
                tracing::info!(
                    task_id = %task_id,
                    trigger = %trigger,
                    status = %updated.status(),
                    "task transitioned"
                );
                Ok(updated)
            }
        }
    }

    /// Replaces the task's publication schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when the task is unknown, already
    /// published, or was modified concurrently.
    pub async fn set_schedule(
        &self,
        task_id: TaskId,
        schedule: PublishSchedule,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.require(task_id).await?;
        task.set_schedule(schedule, &*self.clock)?;
        Ok(self.repository.update(&task).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when no task exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Repository`] when the lookup fails.
    pub async fn find(&self, task_id: TaskId) -> TaskWorkflowResult<Option<Task>> {
        let result: TaskRepositoryResult<Option<Task>> =
            self.repository.find_by_id(task_id).await;
        Ok(result?)
    }

    /// Lists tasks in a workflow status, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Repository`] when the lookup fails.
    pub async fn list_by_status(&self, status: TaskStatus) -> TaskWorkflowResult<Vec<Task>> {
        Ok(self.repository.list_by_status(status).await?)
    }

    async fn require(&self, task_id: TaskId) -> TaskWorkflowResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskWorkflowError::Repository(TaskRepositoryError::NotFound(
                task_id,
            )))
    }
}
