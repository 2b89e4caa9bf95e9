//! In-memory repository for draft review tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::draft::{
    domain::{Draft, DraftId},
    ports::{DraftRepository, DraftRepositoryError, DraftRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory draft repository.
///
/// Maintains the one-live-draft-per-task invariant and the
/// compare-and-swap semantics of [`DraftRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftRepository {
    state: Arc<RwLock<DraftState>>,
}

#[derive(Debug, Default)]
struct DraftState {
    drafts: HashMap<DraftId, Draft>,
    live_index: HashMap<TaskId, DraftId>,
}

impl InMemoryDraftRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> DraftRepositoryError {
    DraftRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Points the live index at the draft, or clears the entry when the
/// draft has left the live (`pending`/`approved`) states.
fn reindex_live(state: &mut DraftState, draft: &Draft) {
    if draft.status().is_live() {
        state.live_index.insert(draft.task_id(), draft.id());
    } else if state.live_index.get(&draft.task_id()) == Some(&draft.id()) {
        state.live_index.remove(&draft.task_id());
    }
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepository {
    async fn store(&self, draft: &Draft) -> DraftRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.drafts.contains_key(&draft.id()) {
            return Err(DraftRepositoryError::DuplicateDraft(draft.id()));
        }
        if draft.status().is_live() && state.live_index.contains_key(&draft.task_id()) {
            return Err(DraftRepositoryError::LiveDraftExists(draft.task_id()));
        }
        reindex_live(&mut state, draft);
        state.drafts.insert(draft.id(), draft.clone());
        Ok(())
    }

    async fn update(&self, draft: &Draft) -> DraftRepositoryResult<Draft> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let stored = state
            .drafts
            .get(&draft.id())
            .ok_or(DraftRepositoryError::NotFound(draft.id()))?;
        if stored.revision() != draft.revision() {
            return Err(DraftRepositoryError::RevisionConflict {
                id: draft.id(),
                read: draft.revision(),
                stored: stored.revision(),
            });
        }
        let mut updated = draft.clone();
        updated.bump_revision();
        reindex_live(&mut state, &updated);
        state.drafts.insert(draft.id(), updated.clone());
        Ok(updated)
    }

    async fn find_by_id(&self, id: DraftId) -> DraftRepositoryResult<Option<Draft>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.drafts.get(&id).cloned())
    }

    async fn live_draft_for_task(&self, task_id: TaskId) -> DraftRepositoryResult<Option<Draft>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .live_index
            .get(&task_id)
            .and_then(|id| state.drafts.get(id))
            .cloned())
    }
}
