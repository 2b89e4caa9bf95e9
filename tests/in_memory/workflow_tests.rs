//! Task lifecycle tests through the public service API.

use super::helpers::{stack, Stack};
use masthead::publish::domain::SocialPlatform;
use masthead::task::{
    domain::{Priority, PublishIntent, PublishSchedule, TaskStatus, WorkflowTrigger},
    services::{NewTaskRequest, TaskWorkflowError},
};
use chrono::{Duration, Utc};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_is_listed_in_backlog(stack: Stack) {
    let created = stack
        .workflow
        .create(
            NewTaskRequest::new("Monthly digest", "persona-5")
                .with_priority(Priority::Low)
                .with_due_date(Utc::now() + Duration::days(7)),
        )
        .await
        .expect("task creation should succeed");

    let backlog = stack
        .workflow
        .list_by_status(TaskStatus::Backlog)
        .await
        .expect("listing should succeed");

    assert_eq!(backlog.len(), 1);
    assert_eq!(backlog[0].id(), created.id());
    assert_eq!(backlog[0].priority(), Priority::Low);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn triggers_move_the_task_between_status_lists(stack: Stack) {
    let created = stack
        .workflow
        .create(NewTaskRequest::new("Status lists", "persona-5"))
        .await
        .expect("task creation should succeed");

    stack
        .workflow
        .apply_trigger(created.id(), WorkflowTrigger::DraftGenerationStarted)
        .await
        .expect("trigger should apply");

    let backlog = stack
        .workflow
        .list_by_status(TaskStatus::Backlog)
        .await
        .expect("listing should succeed");
    let in_progress = stack
        .workflow
        .list_by_status(TaskStatus::InProgress)
        .await
        .expect("listing should succeed");

    assert!(backlog.is_empty());
    assert_eq!(in_progress.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skipping_review_is_rejected(stack: Stack) {
    let created = stack
        .workflow
        .create(NewTaskRequest::new("No shortcuts", "persona-5"))
        .await
        .expect("task creation should succeed");

    let result = stack
        .workflow
        .apply_trigger(created.id(), WorkflowTrigger::DraftApproved)
        .await;

    assert!(matches!(result, Err(TaskWorkflowError::Domain(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schedule_can_be_replaced_before_publication(stack: Stack) {
    let created = stack
        .workflow
        .create(NewTaskRequest::new("Evening slot", "persona-5"))
        .await
        .expect("task creation should succeed");
    let target_time = Utc::now() + Duration::hours(6);

    let updated = stack
        .workflow
        .set_schedule(created.id(), PublishSchedule::Scheduled { target_time })
        .await
        .expect("schedule update should succeed");

    assert_eq!(updated.schedule().target_time(), Some(target_time));
    assert!(updated.revision() > created.revision());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn intent_controls_the_resolved_channel_set(stack: Stack) {
    let created = stack
        .workflow
        .create(
            NewTaskRequest::new("Cross-post", "persona-5").with_intent(PublishIntent::website_and(
                [SocialPlatform::Twitter, SocialPlatform::Linkedin],
            )),
        )
        .await
        .expect("task creation should succeed");

    assert_eq!(created.intent().channels().len(), 3);
    assert_eq!(created.unpublished_channels().len(), 3);
}
