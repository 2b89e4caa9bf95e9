//! In-memory adapters for the publish module.

mod articles;
mod artifacts;
mod social;

pub use articles::InMemoryArticleRepository;
pub use artifacts::InMemoryArtifactRepository;
pub use social::{StubResponse, StubSocialGateway};
