//! Domain model for AI-generated drafts awaiting review.
//!
//! A task holds at most one live (`pending` or `approved`) draft;
//! regeneration supersedes content in place by bumping the content
//! version rather than creating a second row.

mod draft;
mod error;
mod ids;

pub use draft::{Draft, DraftStatus, NewDraft, PersistedDraftData};
pub use error::{DraftDomainError, ParseDraftStatusError};
pub use ids::DraftId;
