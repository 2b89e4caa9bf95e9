//! Immediate-versus-deferred scheduling tests.

use super::helpers::{approved_task, stack, Stack};
use chrono::{Duration, Utc};
use masthead::publish::domain::{
    ArtifactStatus, ChannelOutcome, OutcomeStatus, PublishError, ScheduleHandle, SocialPlatform,
};
use masthead::publish::ports::ArtifactRepository;
use masthead::task::{
    domain::{PublishIntent, PublishSchedule},
    services::NewTaskRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn immediate_schedule_publishes_synchronously(stack: Stack) {
    let (task_id, _) = approved_task(&stack, PublishIntent::website_only()).await;

    let handle = stack
        .scheduler
        .schedule_publish(task_id, PublishSchedule::Immediate)
        .await
        .expect("immediate publish should succeed");

    let ScheduleHandle::Completed(outcome) = handle else {
        panic!("immediate mode should complete synchronously");
    };
    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(stack.articles.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn past_target_time_is_rejected_without_side_effects(stack: Stack) {
    let (task_id, _) = approved_task(&stack, PublishIntent::website_only()).await;
    let yesterday = Utc::now() - Duration::days(1);

    let result = stack
        .scheduler
        .schedule_publish(
            task_id,
            PublishSchedule::Scheduled {
                target_time: yesterday,
            },
        )
        .await;

    assert!(matches!(result, Err(PublishError::PayloadRejected(_))));
    let artifacts = stack
        .artifacts
        .find_for_task(task_id)
        .await
        .expect("lookup should succeed");
    assert!(artifacts.is_empty());
    assert!(stack.articles.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deferral_persists_one_placeholder_per_channel(stack: Stack) {
    let intent = PublishIntent::website_and([SocialPlatform::Twitter]);
    let (task_id, _) = approved_task(&stack, intent).await;
    let target_time = Utc::now() + Duration::hours(4);

    let handle = stack
        .scheduler
        .schedule_publish(task_id, PublishSchedule::Scheduled { target_time })
        .await
        .expect("deferral should succeed");

    let ScheduleHandle::Deferred {
        target_time: deferred_until,
        artifact_ids,
    } = handle
    else {
        panic!("scheduled mode should defer");
    };
    assert_eq!(deferred_until, target_time);
    assert_eq!(artifact_ids.len(), 2);

    let task = stack
        .workflow
        .find(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(task.schedule().target_time(), Some(target_time));

    let artifacts = stack
        .artifacts
        .find_for_task(task_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(artifacts.len(), 2);
    assert!(
        artifacts
            .iter()
            .all(|artifact| artifact.status() == ArtifactStatus::Scheduled)
    );
    // Nothing was dispatched yet.
    assert!(stack.articles.is_empty());
    assert_eq!(stack.gateway.delivery_count(SocialPlatform::Twitter), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deferring_twice_does_not_duplicate_placeholders(stack: Stack) {
    let (task_id, _) = approved_task(&stack, PublishIntent::website_only()).await;
    let target_time = Utc::now() + Duration::hours(4);

    stack
        .scheduler
        .schedule_publish(task_id, PublishSchedule::Scheduled { target_time })
        .await
        .expect("first deferral should succeed");
    let handle = stack
        .scheduler
        .schedule_publish(
            task_id,
            PublishSchedule::Scheduled {
                target_time: target_time + Duration::hours(1),
            },
        )
        .await
        .expect("second deferral should succeed");

    let ScheduleHandle::Deferred { artifact_ids, .. } = handle else {
        panic!("scheduled mode should defer");
    };
    assert!(artifact_ids.is_empty());
    let artifacts = stack
        .artifacts
        .find_for_task(task_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(artifacts.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn promoted_placeholders_publish_through_the_normal_path(stack: Stack) {
    let intent = PublishIntent::website_and([SocialPlatform::Twitter]);
    let (task_id, _) = approved_task(&stack, intent).await;
    let target_time = Utc::now() + Duration::minutes(30);
    stack
        .scheduler
        .schedule_publish(task_id, PublishSchedule::Scheduled { target_time })
        .await
        .expect("deferral should succeed");

    // The time-driven executor fires by re-requesting the publish.
    let outcome = stack
        .orchestrator
        .request_publish(task_id)
        .await
        .expect("promotion should succeed");

    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert!(
        outcome
            .reports
            .iter()
            .all(|report| matches!(report.outcome, ChannelOutcome::Published { .. }))
    );
    let artifacts = stack
        .artifacts
        .find_for_task(task_id)
        .await
        .expect("lookup should succeed");
    assert!(
        artifacts
            .iter()
            .all(|artifact| artifact.status() == ArtifactStatus::Published)
    );
    assert_eq!(stack.articles.len(), 1);
    assert_eq!(stack.gateway.delivery_count(SocialPlatform::Twitter), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scheduling_requires_an_approved_task(stack: Stack) {
    let task = stack
        .workflow
        .create(NewTaskRequest::new("Not approved yet", "persona-1"))
        .await
        .expect("task creation should succeed");

    let result = stack
        .scheduler
        .schedule_publish(
            task.id(),
            PublishSchedule::Scheduled {
                target_time: Utc::now() + Duration::hours(1),
            },
        )
        .await;

    assert!(matches!(result, Err(PublishError::InvalidTransition(_))));
}
