//! In-memory adapters for the draft module.

mod draft;

pub use draft::InMemoryDraftRepository;
