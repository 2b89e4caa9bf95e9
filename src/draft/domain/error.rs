//! Error types for draft domain validation and review transitions.

use super::DraftStatus;
use thiserror::Error;

/// Errors returned while mutating or constructing draft aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftDomainError {
    /// The review action is not legal from the current status.
    #[error("draft in status '{from}' cannot be {action}")]
    InvalidStatus {
        /// Status the draft held.
        from: DraftStatus,
        /// The action that was rejected, e.g. "approved".
        action: &'static str,
    },

    /// Content replacement was attempted after approval froze the draft.
    #[error("approved draft content is frozen; supersede it with a new version before approval")]
    ContentFrozen,

    /// The draft title is empty after trimming.
    #[error("draft title must not be empty")]
    EmptyTitle,
}

/// Error returned while parsing draft statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown draft status: {0}")]
pub struct ParseDraftStatusError(pub String);
