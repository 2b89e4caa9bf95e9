//! Port contracts for the draft module.

mod repository;

pub use repository::{DraftRepository, DraftRepositoryError, DraftRepositoryResult};
