//! In-memory repository for publish artifacts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::publish::{
    domain::{ArtifactId, IdempotencyKey, PublishArtifact},
    ports::{ArtifactRepository, ArtifactRepositoryError, ArtifactRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory artifact repository.
///
/// Enforces the at-most-one-live-artifact-per-key invariant and the
/// compare-and-swap semantics of [`ArtifactRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactRepository {
    state: Arc<RwLock<ArtifactState>>,
}

#[derive(Debug, Default)]
struct ArtifactState {
    artifacts: HashMap<ArtifactId, PublishArtifact>,
    live_index: HashMap<IdempotencyKey, ArtifactId>,
}

impl InMemoryArtifactRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> ArtifactRepositoryError {
    ArtifactRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Points the live index at the artifact, or clears the entry once the
/// artifact has failed.
fn reindex_live(state: &mut ArtifactState, artifact: &PublishArtifact) {
    let key = artifact.key();
    if artifact.status().is_live() {
        state.live_index.insert(key, artifact.id());
    } else if state.live_index.get(&key) == Some(&artifact.id()) {
        state.live_index.remove(&key);
    }
}

#[async_trait]
impl ArtifactRepository for InMemoryArtifactRepository {
    async fn store(&self, artifact: &PublishArtifact) -> ArtifactRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let key = artifact.key();
        if artifact.status().is_live() && state.live_index.contains_key(&key) {
            return Err(ArtifactRepositoryError::LiveArtifactExists(key));
        }
        reindex_live(&mut state, artifact);
        state.artifacts.insert(artifact.id(), artifact.clone());
        Ok(())
    }

    async fn update(
        &self,
        artifact: &PublishArtifact,
    ) -> ArtifactRepositoryResult<PublishArtifact> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let stored = state
            .artifacts
            .get(&artifact.id())
            .ok_or(ArtifactRepositoryError::NotFound(artifact.id()))?;
        if stored.revision() != artifact.revision() {
            return Err(ArtifactRepositoryError::RevisionConflict {
                id: artifact.id(),
                read: artifact.revision(),
                stored: stored.revision(),
            });
        }
        let mut updated = artifact.clone();
        updated.bump_revision();
        reindex_live(&mut state, &updated);
        state.artifacts.insert(artifact.id(), updated.clone());
        Ok(updated)
    }

    async fn find_by_id(
        &self,
        id: ArtifactId,
    ) -> ArtifactRepositoryResult<Option<PublishArtifact>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.artifacts.get(&id).cloned())
    }

    async fn find_live(
        &self,
        key: &IdempotencyKey,
    ) -> ArtifactRepositoryResult<Option<PublishArtifact>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .live_index
            .get(key)
            .and_then(|id| state.artifacts.get(id))
            .cloned())
    }

    async fn find_for_task(
        &self,
        task_id: TaskId,
    ) -> ArtifactRepositoryResult<Vec<PublishArtifact>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut artifacts: Vec<PublishArtifact> = state
            .artifacts
            .values()
            .filter(|artifact| artifact.task_id() == task_id)
            .cloned()
            .collect();
        artifacts.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(artifacts)
    }
}
