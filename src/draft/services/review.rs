//! Service layer for draft submission, regeneration, and review.

use crate::draft::{
    domain::{Draft, DraftDomainError, DraftId, DraftStatus, NewDraft},
    ports::{DraftRepository, DraftRepositoryError, DraftRepositoryResult},
};
use crate::task::{
    domain::{Applied, TaskId, WorkflowTrigger},
    ports::{TaskRepository, TaskRepositoryError},
    services::{TaskWorkflowError, TaskWorkflowService},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a generated draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDraftRequest {
    task_id: TaskId,
    title: String,
    body: String,
    summary: String,
}

impl NewDraftRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(task_id: TaskId, title: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            body: String::new(),
            summary: String::new(),
        }
    }

    /// Sets the draft body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the draft summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }
}

/// Service-level errors for draft review operations.
#[derive(Debug, Error)]
pub enum DraftReviewError {
    /// Domain validation or review-transition failure.
    #[error(transparent)]
    Domain(#[from] DraftDomainError),
    /// Draft repository operation failed.
    #[error(transparent)]
    Repository(#[from] DraftRepositoryError),
    /// The emitted task transition failed.
    #[error(transparent)]
    Workflow(#[from] TaskWorkflowError),
}

/// Result type for draft review service operations.
pub type DraftReviewResult<T> = Result<T, DraftReviewError>;

/// Coordinates the draft store with the task workflow machine.
///
/// Review actions mutate the draft first (guarded by its revision
/// counter, so a concurrent approve and reject resolve deterministically:
/// the second writer observes a stale revision and must re-read), then
/// emit the matching workflow trigger on the owning task.
pub struct DraftReviewService<D, R, C>
where
    D: DraftRepository,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    drafts: Arc<D>,
    workflow: TaskWorkflowService<R, C>,
    clock: Arc<C>,
}

// Derived `Clone` would demand `D: Clone, C: Clone`; only the handles
// need cloning.
impl<D, R, C> Clone for DraftReviewService<D, R, C>
where
    D: DraftRepository,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            drafts: Arc::clone(&self.drafts),
            workflow: self.workflow.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<D, R, C> DraftReviewService<D, R, C>
where
    D: DraftRepository,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new draft review service.
    #[must_use]
    pub const fn new(drafts: Arc<D>, workflow: TaskWorkflowService<R, C>, clock: Arc<C>) -> Self {
        Self {
            drafts,
            workflow,
            clock,
        }
    }

    /// Registers a completed generation as the task's live draft and
    /// moves the task to review.
    ///
    /// # Errors
    ///
    /// Returns [`DraftReviewError::Repository`] when the task already has
    /// a live draft and [`DraftReviewError::Workflow`] when the task is
    /// unknown or cannot move to `needs-review`.
    pub async fn submit(&self, request: NewDraftRequest) -> DraftReviewResult<Draft> {
        // Validate the workflow transition before the draft occupies
        // the task's live slot.
        let task = self.workflow.find(request.task_id).await?.ok_or(
            DraftReviewError::Workflow(TaskWorkflowError::Repository(
                TaskRepositoryError::NotFound(request.task_id),
            )),
        )?;
        task.status()
            .check(WorkflowTrigger::DraftCompleted)
            .map_err(TaskWorkflowError::from)?;

        let draft = Draft::new(
            NewDraft {
                task_id: request.task_id,
                title: request.title,
                body: request.body,
                summary: request.summary,
            },
            &*self.clock,
        )?;
        self.drafts.store(&draft).await?;
        self.workflow
            .apply_trigger(draft.task_id(), WorkflowTrigger::DraftCompleted)
            .await?;
        tracing::info!(draft_id = %draft.id(), task_id = %draft.task_id(), "draft submitted");
        Ok(draft)
    }

    /// Replaces the live pending draft's content, bumping its content
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`DraftReviewError::Domain`] once the draft is approved or
    /// rejected, and [`DraftRepositoryError::RevisionConflict`] when a
    /// concurrent writer wins.
    pub async fn regenerate(
        &self,
        draft_id: DraftId,
        title: impl Into<String> + Send,
        body: impl Into<String> + Send,
        summary: impl Into<String> + Send,
    ) -> DraftReviewResult<Draft> {
        let mut draft = self.require(draft_id).await?;
        draft.replace_content(title, body, summary, &*self.clock)?;
        Ok(self.drafts.update(&draft).await?)
    }

    /// Approves the draft and moves the owning task to `approved`.
    ///
    /// Retrying after a lost task write converges: a draft that already
    /// carries the verdict while its task still awaits the trigger has
    /// the trigger re-emitted instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`DraftReviewError::Domain`] unless the draft is
    /// `pending`, [`DraftRepositoryError::RevisionConflict`] when a
    /// concurrent reviewer won, and [`DraftReviewError::Workflow`] when
    /// the task cannot transition.
    pub async fn approve(&self, draft_id: DraftId) -> DraftReviewResult<Draft> {
        self.review(draft_id, WorkflowTrigger::DraftApproved, Draft::approve)
            .await
    }

    /// Rejects the draft and sends the owning task back to
    /// `in-progress`.
    ///
    /// # Errors
    ///
    /// As [`Self::approve`], with the rejection precondition.
    pub async fn reject(&self, draft_id: DraftId) -> DraftReviewResult<Draft> {
        self.review(draft_id, WorkflowTrigger::DraftRejected, Draft::reject)
            .await
    }

    /// Retrieves a draft by identifier.
    ///
    /// Returns `Ok(None)` when no draft exists.
    ///
    /// # Errors
    ///
    /// Returns [`DraftReviewError::Repository`] when the lookup fails.
    pub async fn find(&self, draft_id: DraftId) -> DraftReviewResult<Option<Draft>> {
        let result: DraftRepositoryResult<Option<Draft>> = self.drafts.find_by_id(draft_id).await;
        Ok(result?)
    }

    /// Returns the task's live draft, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DraftReviewError::Repository`] when the lookup fails.
    pub async fn live_draft(&self, task_id: TaskId) -> DraftReviewResult<Option<Draft>> {
        Ok(self.drafts.live_draft_for_task(task_id).await?)
    }

    async fn review(
        &self,
        draft_id: DraftId,
        trigger: WorkflowTrigger,
        action: fn(&mut Draft, &C) -> Result<(), DraftDomainError>,
    ) -> DraftReviewResult<Draft> {
        let mut draft = self.require(draft_id).await?;
        let updated = match action(&mut draft, &*self.clock) {
            Ok(()) => self.drafts.update(&draft).await?,
            // A draft already carrying this verdict whose task write was
            // lost converges by re-emitting the trigger.
            Err(err) => {
                if self.awaits_trigger(&draft, trigger).await? {
                    draft
                } else {
                    return Err(err.into());
                }
            }
        };
        self.workflow
            .apply_trigger(updated.task_id(), trigger)
            .await?;
        tracing::info!(
            draft_id = %draft_id,
            task_id = %updated.task_id(),
            status = %updated.status(),
            "draft reviewed"
        );
        Ok(updated)
    }

    /// Detects a stranded review: the draft durably carries the requested
    /// verdict, the live slot agrees with it, and the owning task still
    /// accepts the matching trigger as a real transition. Anything else
    /// (a genuine double review included) is not retryable.
    async fn awaits_trigger(
        &self,
        draft: &Draft,
        trigger: WorkflowTrigger,
    ) -> DraftReviewResult<bool> {
        let verdict = match trigger {
            WorkflowTrigger::DraftApproved => DraftStatus::Approved,
            WorkflowTrigger::DraftRejected => DraftStatus::Rejected,
            _ => return Ok(false),
        };
        if draft.status() != verdict {
            return Ok(false);
        }
        // An approved draft still owns the live slot; a rejected draft
        // has freed it. A mismatch means another draft moved in since.
        let live = self.drafts.live_draft_for_task(draft.task_id()).await?;
        let slot_agrees = match verdict {
            DraftStatus::Approved => live.is_some_and(|live| live.id() == draft.id()),
            _ => live.is_none(),
        };
        if !slot_agrees {
            return Ok(false);
        }
        let Some(task) = self.workflow.find(draft.task_id()).await? else {
            return Ok(false);
        };
        Ok(matches!(
            task.status().check(trigger),
            Ok(Applied::Transitioned)
        ))
    }

    async fn require(&self, draft_id: DraftId) -> DraftReviewResult<Draft> {
        self.drafts
            .find_by_id(draft_id)
            .await?
            .ok_or(DraftReviewError::Repository(DraftRepositoryError::NotFound(
                draft_id,
            )))
    }
}
