//! Fan-out, idempotency, and partial-failure tests for publishing.

use super::helpers::{approved_task, stack, Stack, StalledPublisher, UnreachablePublisher};
use masthead::publish::{
    adapters::SocialPublisher,
    domain::{
        ArtifactStatus, ChannelId, ChannelOutcome, OutcomeStatus, PublishError, SocialPlatform,
    },
    services::{OrchestratorConfig, PublishOrchestrator},
};
use masthead::publish::adapters::memory::StubResponse;
use masthead::publish::ports::{ArticleRepository, ArtifactRepository};
use masthead::task::{
    domain::{PublishIntent, TaskId, TaskStatus},
    services::NewTaskRequest,
};
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;

async fn task_status(stack: &Stack, task_id: TaskId) -> TaskStatus {
    stack
        .workflow
        .find(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist")
        .status()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn website_only_publish_creates_the_article_and_publishes_the_task(stack: Stack) {
    let (task_id, draft_id) = approved_task(&stack, PublishIntent::website_only()).await;

    let outcome = stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("publish should succeed");

    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(outcome.reports.len(), 1);
    assert!(matches!(
        outcome.reports[0].outcome,
        ChannelOutcome::Published { .. }
    ));

    assert_eq!(task_status(&stack, task_id).await, TaskStatus::Published);
    assert_eq!(stack.articles.len(), 1);

    let article = stack
        .articles
        .find_by_draft(task_id, 1)
        .await
        .expect("lookup should succeed")
        .expect("article should exist");
    assert_eq!(article.draft_id(), draft_id);
    assert_eq!(article.title(), "Launch announcement");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_publish_reuses_artifacts_without_side_effects(stack: Stack) {
    let intent = PublishIntent::website_and([SocialPlatform::Twitter]);
    let (task_id, _) = approved_task(&stack, intent).await;

    let first = stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("first publish should succeed");
    assert_eq!(first.status, OutcomeStatus::Success);

    let second = stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("second publish should succeed");

    assert_eq!(second.status, OutcomeStatus::Success);
    assert!(second
        .reports
        .iter()
        .all(|report| matches!(report.outcome, ChannelOutcome::Reused { .. })));
    // The reused artifacts are the ones the first request created.
    for report in &second.reports {
        let original = first
            .report_for(report.channel)
            .expect("channel should appear in both outcomes");
        assert_eq!(report.outcome.artifact_id(), original.outcome.artifact_id());
    }
    assert_eq!(stack.articles.len(), 1);
    assert_eq!(stack.gateway.delivery_count(SocialPlatform::Twitter), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn social_failure_is_isolated_from_the_website(stack: Stack) {
    let intent = PublishIntent::website_and([SocialPlatform::Twitter, SocialPlatform::Facebook]);
    let (task_id, _) = approved_task(&stack, intent).await;
    stack.gateway.set_response(
        SocialPlatform::Twitter,
        StubResponse::Unavailable("rate limited".to_owned()),
    );

    let outcome = stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("publish should report partial success");

    assert_eq!(outcome.status, OutcomeStatus::PartialSuccess);
    let failed = outcome.failed_channels();
    assert_eq!(failed.len(), 1);
    assert!(failed.contains(&ChannelId::Social(SocialPlatform::Twitter)));

    let task = stack
        .workflow
        .find(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(task.status(), TaskStatus::Published);
    assert!(task.published_channels().contains(&ChannelId::Website));
    assert!(
        task.published_channels()
            .contains(&ChannelId::Social(SocialPlatform::Facebook))
    );
    assert!(
        !task
            .published_channels()
            .contains(&ChannelId::Social(SocialPlatform::Twitter))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_republishes_only_the_failed_channel(stack: Stack) {
    let intent = PublishIntent::website_and([SocialPlatform::Twitter, SocialPlatform::Facebook]);
    let (task_id, _) = approved_task(&stack, intent).await;
    stack.gateway.set_response(
        SocialPlatform::Twitter,
        StubResponse::Unavailable("rate limited".to_owned()),
    );
    stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("first publish should report partial success");

    stack
        .gateway
        .set_response(SocialPlatform::Twitter, StubResponse::Succeed);
    let retry = stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("retry should succeed");

    assert_eq!(retry.status, OutcomeStatus::Success);
    let twitter = retry
        .report_for(ChannelId::Social(SocialPlatform::Twitter))
        .expect("twitter should be reported");
    assert!(matches!(twitter.outcome, ChannelOutcome::Published { .. }));

    // Channels that already succeeded were not re-dispatched.
    assert_eq!(stack.articles.len(), 1);
    assert_eq!(stack.gateway.delivery_count(SocialPlatform::Facebook), 1);
    assert_eq!(stack.gateway.delivery_count(SocialPlatform::Twitter), 2);

    let task = stack
        .workflow
        .find(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert!(task.unpublished_channels().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn website_failure_keeps_the_task_approved(stack: Stack) {
    let intent = PublishIntent::website_and([SocialPlatform::Twitter]);
    let (task_id, _) = approved_task(&stack, intent).await;

    let orchestrator = PublishOrchestrator::new(
        Arc::clone(&stack.tasks),
        Arc::clone(&stack.drafts),
        Arc::clone(&stack.artifacts),
        Arc::clone(&stack.clock),
    )
    .with_publisher(Arc::new(UnreachablePublisher::new(ChannelId::Website)))
    .with_publisher(Arc::new(SocialPublisher::new(
        SocialPlatform::Twitter,
        Arc::clone(&stack.gateway),
    )));

    let outcome = orchestrator
        .request_publish(task_id)
        .await
        .expect("request should settle");

    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert_eq!(task_status(&stack, task_id).await, TaskStatus::Approved);

    let website = outcome
        .report_for(ChannelId::Website)
        .expect("website should be reported");
    assert!(matches!(
        website.outcome,
        ChannelOutcome::Failed {
            error: PublishError::ChannelUnavailable(_)
        }
    ));

    // The website artifact is failed, so a later retry dispatches again.
    let retry = stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("retry should succeed");
    assert_eq!(retry.status, OutcomeStatus::Success);
    assert_eq!(task_status(&stack, task_id).await, TaskStatus::Published);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn over_length_social_copy_is_rejected_permanently(stack: Stack) {
    // Default social copy derives from the draft title; a 300-character
    // title pushes it over the 280-character limit.
    let task = stack
        .workflow
        .create(
            NewTaskRequest::new("Long headline", "persona-1")
                .with_intent(PublishIntent::website_and([SocialPlatform::Twitter])),
        )
        .await
        .expect("task creation should succeed");
    stack
        .workflow
        .apply_trigger(
            task.id(),
            masthead::task::domain::WorkflowTrigger::DraftGenerationStarted,
        )
        .await
        .expect("drafting should start");
    let draft = stack
        .review
        .submit(
            masthead::draft::services::NewDraftRequest::new(task.id(), "z".repeat(300))
                .with_body("Body.")
                .with_summary("Summary."),
        )
        .await
        .expect("submission should succeed");
    stack
        .review
        .approve(draft.id())
        .await
        .expect("approval should succeed");

    let outcome = stack
        .orchestrator
        .request_publish(task.id())
        .await
        .expect("request should settle");

    assert_eq!(outcome.status, OutcomeStatus::PartialSuccess);
    let twitter = outcome
        .report_for(ChannelId::Social(SocialPlatform::Twitter))
        .expect("twitter should be reported");
    assert!(matches!(
        twitter.outcome,
        ChannelOutcome::Failed {
            error: PublishError::PayloadRejected(_)
        }
    ));
    // The platform never saw the over-length post.
    assert_eq!(stack.gateway.delivery_count(SocialPlatform::Twitter), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publish_requires_an_approved_task(stack: Stack) {
    let task = stack
        .workflow
        .create(NewTaskRequest::new("Not ready", "persona-1"))
        .await
        .expect("task creation should succeed");

    let result = stack.orchestrator.request_publish(task.id()).await;

    assert!(matches!(result, Err(PublishError::InvalidTransition(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publish_of_unknown_task_reports_not_found(stack: Stack) {
    let result = stack.orchestrator.request_publish(TaskId::new()).await;

    assert!(matches!(result, Err(PublishError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_intent_is_rejected_before_any_dispatch(stack: Stack) {
    let (task_id, _) = approved_task(&stack, PublishIntent::default()).await;

    let result = stack.orchestrator.request_publish(task_id).await;

    assert!(matches!(result, Err(PublishError::PayloadRejected(_))));
    assert!(stack.articles.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_channel_times_out_as_unavailable(stack: Stack) {
    let intent = PublishIntent::social_only([SocialPlatform::Twitter]);
    let (task_id, _) = approved_task(&stack, intent).await;

    let orchestrator = PublishOrchestrator::new(
        Arc::clone(&stack.tasks),
        Arc::clone(&stack.drafts),
        Arc::clone(&stack.artifacts),
        Arc::clone(&stack.clock),
    )
    .with_publisher(Arc::new(StalledPublisher::new(ChannelId::Social(
        SocialPlatform::Twitter,
    ))))
    .with_config(OrchestratorConfig {
        channel_timeout: Duration::from_millis(50),
    });

    let outcome = orchestrator
        .request_publish(task_id)
        .await
        .expect("request should settle");

    assert_eq!(outcome.status, OutcomeStatus::Failed);
    let twitter = outcome
        .report_for(ChannelId::Social(SocialPlatform::Twitter))
        .expect("twitter should be reported");
    assert!(matches!(
        twitter.outcome,
        ChannelOutcome::Failed {
            error: PublishError::ChannelUnavailable(_)
        }
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_dispatch_leaves_a_failed_artifact_behind(stack: Stack) {
    let intent = PublishIntent::social_only([SocialPlatform::Twitter]);
    let (task_id, _) = approved_task(&stack, intent).await;
    stack.gateway.set_response(
        SocialPlatform::Twitter,
        StubResponse::Unavailable("connection reset".to_owned()),
    );

    let outcome = stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("request should settle");
    assert_eq!(outcome.status, OutcomeStatus::Failed);

    let artifacts = stack
        .artifacts
        .find_for_task(task_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].status(), ArtifactStatus::Failed);
    assert!(
        artifacts[0]
            .error()
            .is_some_and(|message| message.contains("connection reset"))
    );
    // Nothing succeeded, so the task must not move to published.
    assert_eq!(task_status(&stack, task_id).await, TaskStatus::Approved);
}
