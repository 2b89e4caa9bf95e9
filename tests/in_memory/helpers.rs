//! Shared test helpers wiring the full in-memory publishing stack.

use async_trait::async_trait;
use masthead::draft::{
    adapters::memory::InMemoryDraftRepository,
    domain::DraftId,
    services::{DraftReviewService, NewDraftRequest},
};
use masthead::publish::{
    adapters::{
        memory::{InMemoryArticleRepository, InMemoryArtifactRepository, StubSocialGateway},
        SocialPublisher, WebsitePublisher,
    },
    domain::{ChannelId, PublishError, SocialPlatform},
    ports::{ChannelPublisher, DispatchRequest},
    services::{PublishOrchestrator, SchedulerGateway},
};
use masthead::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{PublishIntent, TaskId, WorkflowTrigger},
    services::{NewTaskRequest, TaskWorkflowService},
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

pub type Workflow = TaskWorkflowService<InMemoryTaskRepository, DefaultClock>;
pub type Review =
    DraftReviewService<InMemoryDraftRepository, InMemoryTaskRepository, DefaultClock>;
pub type Orchestrator = PublishOrchestrator<
    InMemoryTaskRepository,
    InMemoryDraftRepository,
    InMemoryArtifactRepository,
    DefaultClock,
>;
pub type Scheduler = SchedulerGateway<
    InMemoryTaskRepository,
    InMemoryDraftRepository,
    InMemoryArtifactRepository,
    DefaultClock,
>;

/// The full pipeline over in-memory stores, with every channel publisher
/// registered and the social gateway scriptable per platform.
pub struct Stack {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub drafts: Arc<InMemoryDraftRepository>,
    pub artifacts: Arc<InMemoryArtifactRepository>,
    pub articles: Arc<InMemoryArticleRepository>,
    pub gateway: Arc<StubSocialGateway>,
    pub clock: Arc<DefaultClock>,
    pub workflow: Workflow,
    pub review: Review,
    pub orchestrator: Arc<Orchestrator>,
    pub scheduler: Scheduler,
}

/// Provides a freshly wired stack for each test.
#[fixture]
pub fn stack() -> Stack {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let drafts = Arc::new(InMemoryDraftRepository::new());
    let artifacts = Arc::new(InMemoryArtifactRepository::new());
    let articles = Arc::new(InMemoryArticleRepository::new());
    let gateway = Arc::new(StubSocialGateway::new());
    let clock = Arc::new(DefaultClock);

    let workflow = TaskWorkflowService::new(Arc::clone(&tasks), Arc::clone(&clock));
    let review = DraftReviewService::new(Arc::clone(&drafts), workflow.clone(), Arc::clone(&clock));

    let mut orchestrator = PublishOrchestrator::new(
        Arc::clone(&tasks),
        Arc::clone(&drafts),
        Arc::clone(&artifacts),
        Arc::clone(&clock),
    )
    .with_publisher(Arc::new(WebsitePublisher::new(
        Arc::clone(&articles),
        Arc::clone(&clock),
    )));
    for platform in SocialPlatform::ALL {
        orchestrator = orchestrator.with_publisher(Arc::new(SocialPublisher::new(
            platform,
            Arc::clone(&gateway),
        )));
    }
    let orchestrator = Arc::new(orchestrator);

    let scheduler = SchedulerGateway::new(
        Arc::clone(&tasks),
        Arc::clone(&drafts),
        Arc::clone(&artifacts),
        Arc::clone(&orchestrator),
        Arc::clone(&clock),
    );

    Stack {
        tasks,
        drafts,
        artifacts,
        articles,
        gateway,
        clock,
        workflow,
        review,
        orchestrator,
        scheduler,
    }
}

/// Walks a task from creation through draft approval, leaving it ready
/// to publish.
pub async fn approved_task(stack: &Stack, intent: PublishIntent) -> (TaskId, DraftId) {
    let task = stack
        .workflow
        .create(NewTaskRequest::new("Launch announcement", "persona-1").with_intent(intent))
        .await
        .expect("task creation should succeed");
    stack
        .workflow
        .apply_trigger(task.id(), WorkflowTrigger::DraftGenerationStarted)
        .await
        .expect("drafting should start");
    let draft = stack
        .review
        .submit(
            NewDraftRequest::new(task.id(), "Launch announcement")
                .with_body("We are live.")
                .with_summary("Launch day."),
        )
        .await
        .expect("submission should succeed");
    stack
        .review
        .approve(draft.id())
        .await
        .expect("approval should succeed");
    (task.id(), draft.id())
}

/// A channel publisher that always reports the channel unreachable.
pub struct UnreachablePublisher {
    channel: ChannelId,
}

impl UnreachablePublisher {
    #[must_use]
    pub const fn new(channel: ChannelId) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl ChannelPublisher for UnreachablePublisher {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    async fn publish(&self, _request: &DispatchRequest) -> Result<String, PublishError> {
        Err(PublishError::ChannelUnavailable(format!(
            "{} is down for maintenance",
            self.channel
        )))
    }
}

/// A channel publisher that never answers within any reasonable bound.
pub struct StalledPublisher {
    channel: ChannelId,
}

impl StalledPublisher {
    #[must_use]
    pub const fn new(channel: ChannelId) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl ChannelPublisher for StalledPublisher {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    async fn publish(&self, _request: &DispatchRequest) -> Result<String, PublishError> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok("unreachable".to_owned())
    }
}
