//! Orchestration services for the draft module.

mod review;

pub use review::{DraftReviewError, DraftReviewResult, DraftReviewService, NewDraftRequest};
