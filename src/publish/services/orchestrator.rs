//! Publish fan-out orchestration.
//!
//! Converts an approved task/draft pair into durable publish artifacts,
//! dispatches the requested channels concurrently, reconciles partial
//! failure, and drives the task workflow to `published`.

use crate::draft::{
    domain::{Draft, DraftStatus},
    ports::DraftRepository,
};
use crate::publish::{
    domain::{
        ArtifactId, ArtifactSource, ArtifactStatus, ChannelId, ChannelOutcome, ChannelReport,
        IdempotencyKey, OutcomeStatus, PublishArtifact, PublishError, PublishOutcome,
        PublishPayload,
    },
    ports::{ArtifactRepository, ArtifactRepositoryError, ChannelPublisher, DispatchRequest},
};
use crate::task::{
    domain::{Applied, Task, TaskId, TaskStatus},
    ports::TaskRepository,
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Tuning knobs for publish dispatch.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Upper bound on one channel publisher call. Exceeding it yields
    /// `ChannelUnavailable` for that channel only.
    pub channel_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_timeout: Duration::from_secs(30),
        }
    }
}

/// Coordinates the publish fan-out for one task at a time.
///
/// The orchestrator owns artifact lifecycle and aggregation; channel
/// publishers only know how to deliver one payload. Task state is
/// written exactly once, after every channel has settled, through the
/// repository's compare-and-swap, so a cancelled caller either sees the
/// full aggregation or nothing.
pub struct PublishOrchestrator<T, D, A, C>
where
    T: TaskRepository + 'static,
    D: DraftRepository + 'static,
    A: ArtifactRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    tasks: Arc<T>,
    drafts: Arc<D>,
    artifacts: Arc<A>,
    publishers: HashMap<ChannelId, Arc<dyn ChannelPublisher>>,
    clock: Arc<C>,
    config: OrchestratorConfig,
}

impl<T, D, A, C> PublishOrchestrator<T, D, A, C>
where
    T: TaskRepository + 'static,
    D: DraftRepository + 'static,
    A: ArtifactRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an orchestrator with no registered publishers.
    #[must_use]
    pub fn new(tasks: Arc<T>, drafts: Arc<D>, artifacts: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            drafts,
            artifacts,
            publishers: HashMap::new(),
            clock,
            config: OrchestratorConfig::default(),
        }
    }

    /// Registers a channel publisher, keyed by the channel it serves.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn ChannelPublisher>) -> Self {
        self.publishers.insert(publisher.channel(), publisher);
        self
    }

    /// Overrides the dispatch configuration.
    #[must_use]
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Publishes the task to every channel its intent selects.
    ///
    /// Channels holding a `published` artifact for the current draft
    /// version are reused without dispatch, which makes retries safe:
    /// each (task, draft version, channel) key produces at most one
    /// durable effect. A website failure aborts the request (the task is
    /// not marked published); social failures are isolated per channel
    /// and reported in the outcome. A request where no channel succeeds
    /// or is reused settles as `failed` with the task untouched, even
    /// for a social-only intent, so the task never reaches `published`
    /// with an empty channel set.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::NotFound`] for an unknown task or missing
    /// live draft, [`PublishError::InvalidTransition`] when task or draft
    /// is not approved, [`PublishError::PayloadRejected`] for an empty
    /// publish intent, and [`PublishError::ConcurrentModification`] when
    /// the final task write loses a race.
    pub async fn request_publish(&self, task_id: TaskId) -> Result<PublishOutcome, PublishError> {
        let task = self.load_approved_task(task_id).await?;
        let draft = self.load_approved_draft(&task).await?;

        let channels = task.intent().channels();
        if channels.is_empty() {
            return Err(PublishError::PayloadRejected(
                "publish intent selects no channels".to_owned(),
            ));
        }

        let payload = PublishPayload::from_draft(&task, &draft);
        let mut reports: Vec<ChannelReport> = Vec::with_capacity(channels.len());
        let mut handles: Vec<(ChannelId, JoinHandle<ChannelOutcome>)> = Vec::new();

        for channel in &channels {
            let source = ArtifactSource {
                task_id,
                draft_id: draft.id(),
                draft_version: draft.version(),
                channel: *channel,
            };
            match self.prepare_artifact(source).await? {
                Prepared::Reused(artifact_id) => {
                    reports.push(ChannelReport {
                        channel: *channel,
                        outcome: ChannelOutcome::Reused { artifact_id },
                    });
                }
                Prepared::Dispatch(artifact) => {
                    let handle = self.spawn_dispatch(
                        source,
                        artifact,
                        DispatchRequest {
                            source,
                            payload: payload.clone(),
                        },
                    );
                    handles.push((*channel, handle));
                }
            }
        }

        for (channel, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|join_err| ChannelOutcome::Failed {
                error: PublishError::ChannelUnavailable(format!(
                    "dispatch for {channel} did not complete: {join_err}"
                )),
            });
            if let ChannelOutcome::Failed { error } = &outcome {
                tracing::warn!(task_id = %task_id, channel = %channel, %error, "channel failed");
            }
            reports.push(ChannelReport {
                channel,
                outcome,
            });
        }
        reports.sort_by_key(|report| report.channel);

        self.settle(task, draft.version(), reports).await
    }

    /// Applies the aggregation rules and, when at least one channel
    /// succeeded and the website did not fail, records the publication
    /// on the task in a single write.
    async fn settle(
        &self,
        mut task: Task,
        draft_version: u32,
        reports: Vec<ChannelReport>,
    ) -> Result<PublishOutcome, PublishError> {
        let task_id = task.id();
        let website_failed = reports
            .iter()
            .any(|report| report.channel.is_website() && !report.outcome.is_success());
        let any_failed = reports.iter().any(|report| !report.outcome.is_success());

        let succeeded: Vec<ChannelId> = reports
            .iter()
            .filter(|report| report.outcome.is_success())
            .map(|report| report.channel)
            .collect();

        // The website gates publication; a request where nothing
        // succeeded also publishes nothing.
        if website_failed || succeeded.is_empty() {
            tracing::warn!(task_id = %task_id, "publish failed; task state untouched");
            return Ok(PublishOutcome {
                task_id,
                draft_version,
                status: OutcomeStatus::Failed,
                reports,
            });
        }
        let recorded_before = task.published_channels().clone();
        let applied = task.record_publication(succeeded, &*self.clock)?;
        if applied == Applied::Transitioned || *task.published_channels() != recorded_before {
            task = self.tasks.update(&task).await?;
        }
        tracing::info!(
            task_id = %task_id,
            status = %task.status(),
            channels = ?task.published_channels(),
            "publish settled"
        );

        Ok(PublishOutcome {
            task_id,
            draft_version,
            status: if any_failed {
                OutcomeStatus::PartialSuccess
            } else {
                OutcomeStatus::Success
            },
            reports,
        })
    }

    async fn load_approved_task(&self, task_id: TaskId) -> Result<Task, PublishError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| PublishError::NotFound(format!("task {task_id}")))?;
        // `published` is accepted so callers can retry channels that
        // failed on an earlier, partially successful request.
        if !matches!(task.status(), TaskStatus::Approved | TaskStatus::Published) {
            return Err(PublishError::InvalidTransition(format!(
                "task {task_id} is '{}', publish requires 'approved'",
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
                "draft {} is '{}', publish requires 'approved'",
                draft.id(),
                draft.status()
            )));
        }
        Ok(draft)
    }

    /// Resolves the idempotency key: reuse a published artifact, promote
    /// a scheduled or stalled one, or create a fresh record at dispatch
    /// time.
    async fn prepare_artifact(&self, source: ArtifactSource) -> Result<Prepared, PublishError> {
        let key = IdempotencyKey::new(source.task_id, source.draft_version, source.channel);
        if let Some(live) = self.artifacts.find_live(&key).await? {
            return Ok(match live.status() {
                ArtifactStatus::Published => Prepared::Reused(live.id()),
                _ => Prepared::Dispatch(live),
            });
        }

        let artifact = PublishArtifact::dispatched(source, &*self.clock);
        match self.artifacts.store(&artifact).await {
            Ok(()) => Ok(Prepared::Dispatch(artifact)),
            // A concurrent request created the live artifact first.
            Err(ArtifactRepositoryError::LiveArtifactExists(_)) => {
                let winner = self.artifacts.find_live(&key).await?.ok_or_else(|| {
                    PublishError::ConcurrentModification(format!(
                        "artifact for {key} appeared and vanished during dispatch"
                    ))
                })?;
                Ok(match winner.status() {
                    ArtifactStatus::Published => Prepared::Reused(winner.id()),
                    _ => Prepared::Dispatch(winner),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Spawns one channel dispatch as a detached task.
    ///
    /// Detaching means a caller that cancels `request_publish` leaves
    /// in-flight publisher calls running to completion; external
    /// publications cannot be undone. Task state is still only written by
    /// the surviving aggregation step.
    fn spawn_dispatch(
        &self,
        source: ArtifactSource,
        artifact: PublishArtifact,
        request: DispatchRequest,
    ) -> JoinHandle<ChannelOutcome> {
        let publisher = self.publishers.get(&source.channel).cloned();
        let artifacts = Arc::clone(&self.artifacts);
        let clock = Arc::clone(&self.clock);
        let bound = self.config.channel_timeout;
        tokio::spawn(async move {
            let Some(publisher) = publisher else {
                return ChannelOutcome::Failed {
                    error: PublishError::ChannelUnavailable(format!(
                        "no publisher registered for {}",
                        source.channel
                    )),
                };
            };
            dispatch_channel(publisher, artifacts, clock, bound, artifact, request).await
        })
    }
}

/// Artifact resolution for one channel ahead of dispatch.
enum Prepared {
    /// A published artifact exists; skip dispatch.
    Reused(ArtifactId),
    /// Dispatch with this (fresh, scheduled, or stalled) artifact.
    Dispatch(PublishArtifact),
}

/// Runs one channel publisher under a timeout and records the result on
/// the artifact.
async fn dispatch_channel<A, C>(
    publisher: Arc<dyn ChannelPublisher>,
    artifacts: Arc<A>,
    clock: Arc<C>,
    bound: Duration,
    mut artifact: PublishArtifact,
    request: DispatchRequest,
) -> ChannelOutcome
where
    A: ArtifactRepository,
    C: Clock + Send + Sync,
{
    if let Err(err) = artifact.mark_publishing(&*clock) {
        return ChannelOutcome::Failed { error: err.into() };
    }
    artifact = match artifacts.update(&artifact).await {
        Ok(updated) => updated,
        Err(err) => return ChannelOutcome::Failed { error: err.into() },
    };

    let channel = artifact.channel();
    let result = match tokio::time::timeout(bound, publisher.publish(&request)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(PublishError::ChannelUnavailable(format!(
            "{channel} publisher exceeded {bound:?}"
        ))),
    };

    match result {
        Ok(external_ref) => {
            if let Err(err) = artifact.complete(external_ref, &*clock) {
                return ChannelOutcome::Failed { error: err.into() };
            }
            match artifacts.update(&artifact).await {
                Ok(saved) => ChannelOutcome::Published {
                    artifact_id: saved.id(),
                },
                Err(err) => ChannelOutcome::Failed { error: err.into() },
            }
        }
        Err(publish_err) => {
            if artifact.fail(publish_err.to_string(), &*clock).is_ok() {
                if let Err(record_err) = artifacts.update(&artifact).await {
                    tracing::warn!(%channel, error = %record_err, "failed to record artifact failure");
                }
            }
            ChannelOutcome::Failed { error: publish_err }
        }
    }
}
