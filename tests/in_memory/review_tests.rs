//! Draft review tests through the public service API.

use super::helpers::{stack, Stack};
use masthead::draft::{domain::DraftStatus, services::NewDraftRequest};
use masthead::task::{
    domain::{TaskStatus, WorkflowTrigger},
    services::NewTaskRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submission_requires_a_task_in_drafting(stack: Stack) {
    let task = stack
        .workflow
        .create(NewTaskRequest::new("Too early", "persona-2"))
        .await
        .expect("task creation should succeed");

    // The task is still in backlog; completing a draft is not legal yet.
    let result = stack
        .review
        .submit(NewDraftRequest::new(task.id(), "Premature draft"))
        .await;

    assert!(result.is_err());
    // The rejected submission must not occupy the live slot.
    let live = stack
        .review
        .live_draft(task.id())
        .await
        .expect("lookup should succeed");
    assert!(live.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_review_cycle_reaches_approval(stack: Stack) {
    let task = stack
        .workflow
        .create(NewTaskRequest::new("Review cycle", "persona-2"))
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
            NewDraftRequest::new(task.id(), "First pass")
                .with_body("Initial body.")
                .with_summary("Initial summary."),
        )
        .await
        .expect("submission should succeed");

    // Reviewer sends it back once before approving the rework.
    stack
        .review
        .reject(draft.id())
        .await
        .expect("rejection should succeed");
    let rework = stack
        .review
        .submit(
            NewDraftRequest::new(task.id(), "Second pass")
                .with_body("Reworked body.")
                .with_summary("Reworked summary."),
        )
        .await
        .expect("resubmission should succeed");
    let approved = stack
        .review
        .approve(rework.id())
        .await
        .expect("approval should succeed");

    assert_eq!(approved.status(), DraftStatus::Approved);
    let task = stack
        .workflow
        .find(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(task.status(), TaskStatus::Approved);

    let live = stack
        .review
        .live_draft(task.id())
        .await
        .expect("lookup should succeed")
        .expect("live draft should exist");
    assert_eq!(live.id(), rework.id());
    assert_eq!(live.title(), "Second pass");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_reviewers_settle_on_exactly_one_verdict(stack: Stack) {
    // Several rounds so the approve/reject interleavings actually vary.
    for round in 0..16 {
        let task = stack
            .workflow
            .create(NewTaskRequest::new("Contested verdict", "persona-2"))
            .await
            .expect("task creation should succeed");
        stack
            .workflow
            .apply_trigger(task.id(), WorkflowTrigger::DraftGenerationStarted)
            .await
            .expect("drafting should start");
        let draft = stack
            .review
            .submit(NewDraftRequest::new(task.id(), "Contested draft"))
            .await
            .expect("submission should succeed");

        let approve = tokio::spawn({
            let review = stack.review.clone();
            let draft_id = draft.id();
            async move { review.approve(draft_id).await }
        });
        let reject = tokio::spawn({
            let review = stack.review.clone();
            let draft_id = draft.id();
            async move { review.reject(draft_id).await }
        });
        let approve = approve.await.expect("approval should not panic");
        let reject = reject.await.expect("rejection should not panic");

        assert!(
            approve.is_ok() != reject.is_ok(),
            "round {round}: exactly one reviewer must win"
        );

        let settled = stack
            .review
            .find(draft.id())
            .await
            .expect("lookup should succeed")
            .expect("draft should exist");
        let owner = stack
            .workflow
            .find(task.id())
            .await
            .expect("lookup should succeed")
            .expect("task should exist");
        if approve.is_ok() {
            assert_eq!(settled.status(), DraftStatus::Approved);
            assert_eq!(owner.status(), TaskStatus::Approved);
        } else {
            assert_eq!(settled.status(), DraftStatus::Rejected);
            assert_eq!(owner.status(), TaskStatus::InProgress);
        }
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn regeneration_is_visible_to_the_next_reviewer(stack: Stack) {
    let task = stack
        .workflow
        .create(NewTaskRequest::new("Iterate", "persona-2"))
        .await
        .expect("task creation should succeed");
    stack
        .workflow
        .apply_trigger(task.id(), WorkflowTrigger::DraftGenerationStarted)
        .await
        .expect("drafting should start");
    let draft = stack
        .review
        .submit(NewDraftRequest::new(task.id(), "Rough cut"))
        .await
        .expect("submission should succeed");

    stack
        .review
        .regenerate(draft.id(), "Polished cut", "Better body.", "Better summary.")
        .await
        .expect("regeneration should succeed");

    let live = stack
        .review
        .live_draft(task.id())
        .await
        .expect("lookup should succeed")
        .expect("live draft should exist");
    assert_eq!(live.version(), 2);
    assert_eq!(live.title(), "Polished cut");
}
